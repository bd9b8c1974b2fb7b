// WHOIS Client - Error Types
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::core::validate::ValidationRejection;

/// Input bytes could not be turned into text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("Cannot decode input as {codepage}")]
    Malformed { codepage: String },

    #[error("Unknown codepage: {0}")]
    UnknownCodepage(String),

    #[error("Cannot convert label to ACE: {0}")]
    AceEncoding(String),
}

/// Errors raised by the whois lookup collaborator
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Cannot connect to whois server {server}: {source}")]
    Connect {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Connection to whois server {server} timed out")]
    Timeout { server: String },

    #[error("Failed to talk to whois server {server}: {source}")]
    Io {
        server: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty response from whois server {0}")]
    EmptyResponse(String),

    #[error("Invalid source address: {0}")]
    SourceAddress(String),

    #[error("Cache error: {0}")]
    Cache(String),
}

/// Everything the driver may have to report to the user
#[derive(Error, Debug)]
pub enum WhoisError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Incorrect domain name: {name}")]
    InvalidDomain {
        name: String,
        rejection: ValidationRejection,
    },

    #[error("Failed to get whois info for {0}")]
    LookupFailed(String),

    #[error(transparent)]
    Lookup(#[from] LookupError),
}

impl LookupError {
    /// Timeouts and empty answers can be retried by the user as-is
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::EmptyResponse(_))
    }
}

static LOCATION_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s+at\s+\S+\s+line\s+\d+\.?\s*$").expect("Invalid location suffix pattern")
});

/// Drop a trailing "at <location> line <n>." diagnostic and surrounding whitespace
pub fn sanitize_error_message(message: &str) -> String {
    LOCATION_SUFFIX.replace(message.trim_end(), "").trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_location_suffix() {
        assert_eq!(
            sanitize_error_message("Connection refused at /usr/share/perl5/Net/Whois/Raw.pm line 350.\n"),
            "Connection refused"
        );
        assert_eq!(
            sanitize_error_message("Timeout at lib/whois.rs line 12"),
            "Timeout"
        );
    }

    #[test]
    fn test_sanitize_keeps_ordinary_messages() {
        assert_eq!(
            sanitize_error_message("Connection to whois server whois.iana.org timed out"),
            "Connection to whois server whois.iana.org timed out"
        );
        assert_eq!(sanitize_error_message("look at this  \n"), "look at this");
    }

    #[test]
    fn test_recoverable_errors() {
        assert!(LookupError::Timeout { server: "whois.iana.org".into() }.is_recoverable());
        assert!(!LookupError::Cache("broken".into()).is_recoverable());
    }

    #[test]
    fn test_invalid_domain_message() {
        let error = WhoisError::InvalidDomain {
            name: "-foo.com".to_string(),
            rejection: ValidationRejection::LeadingHyphen,
        };
        assert_eq!(error.to_string(), "Incorrect domain name: -foo.com");
    }
}
