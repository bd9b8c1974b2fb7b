// WHOIS Client - Response Cleanup
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Disclaimer stripping and "not found" detection for raw responses

use once_cell::sync::Lazy;
use regex::Regex;

/// Comment lines: RPSL `%`, shell-style `#`, and the `>>> Last update` banner
static COMMENT_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(%|#|>>>)").expect("Invalid comment line pattern"));

/// Paragraphs of legal text, dropped up to the next blank line
static DISCLAIMER_START: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*(NOTICE:|TERMS OF USE:|For more information on Whois status codes|The Registry database contains ONLY|URL of the ICANN Whois Inaccuracy Complaint Form|By submitting a WHOIS query)",
    )
    .expect("Invalid disclaimer pattern")
});

static NOT_FOUND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?im)(^\s*no match( for)?\b|^\s*not found\b|no entries found|no data found|no matching record|no object found|object does not exist|domain not found|^\s*status:\s*(free|available)\s*$|is available for registration)",
    )
    .expect("Invalid not-found pattern")
});

/// Drop comments and legal boilerplate, squeeze blank lines
pub fn strip_disclaimer(text: &str) -> String {
    let mut output: Vec<&str> = Vec::new();
    let mut in_disclaimer = false;

    for line in text.lines() {
        let blank = line.trim().is_empty();

        if in_disclaimer {
            in_disclaimer = !blank;
            continue;
        }
        if DISCLAIMER_START.is_match(line) {
            in_disclaimer = true;
            continue;
        }
        if COMMENT_LINE.is_match(line) {
            continue;
        }
        if blank && output.last().is_none_or(|last| last.trim().is_empty()) {
            continue;
        }

        output.push(line);
    }

    while output.last().is_some_and(|last| last.trim().is_empty()) {
        output.pop();
    }

    let mut stripped = output.join("\n");
    if !stripped.is_empty() {
        stripped.push('\n');
    }
    stripped
}

/// Whether the registry says the object does not exist
pub fn is_not_found(text: &str) -> bool {
    text.trim().is_empty() || NOT_FOUND.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comments_and_blank_runs() {
        let text = "% This is the RIPE Database query service.\n%\n\n\ninetnum: 193.0.0.0 - 193.0.7.255\n\n\n\nnetname: RIPE-NCC\n";
        assert_eq!(
            strip_disclaimer(text),
            "inetnum: 193.0.0.0 - 193.0.7.255\n\nnetname: RIPE-NCC\n"
        );
    }

    #[test]
    fn test_strip_legal_paragraphs() {
        let text = "Domain Name: EXAMPLE.COM\n\
                    >>> Last update of whois database: 2025-01-01T00:00:00Z <<<\n\
                    \n\
                    For more information on Whois status codes, please visit https://icann.org/epp\n\
                    \n\
                    NOTICE: The expiration date displayed in this record is the date the\n\
                    registrar's sponsorship of the domain name registration in the registry is\n\
                    currently set to expire.\n\
                    \n\
                    TERMS OF USE: You are not authorized to access or query our Whois\n\
                    database through the use of electronic processes.\n";
        assert_eq!(strip_disclaimer(text), "Domain Name: EXAMPLE.COM\n");
    }

    #[test]
    fn test_strip_empty() {
        assert_eq!(strip_disclaimer(""), "");
        assert_eq!(strip_disclaimer("% only comments\n% here\n"), "");
    }

    #[test]
    fn test_not_found() {
        assert!(is_not_found("No match for \"NOPE-EXAMPLE.COM\".\n"));
        assert!(is_not_found("% This is the RIPE Database\n%ERROR:101: no entries found\n"));
        assert!(is_not_found("No entries found for the selected source(s).\n"));
        assert!(is_not_found("Domain: nope.de\nStatus: free\n"));
        assert!(is_not_found("   \n"));
        assert!(!is_not_found("Domain Name: EXAMPLE.COM\nRegistrar: Example Registrar\n"));
        assert!(!is_not_found("remarks: see https://example.net/not-found-page for help\n"));
    }
}
