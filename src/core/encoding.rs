// WHOIS Client - Codepage Detection
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Codepages for decoding the command line and encoding terminal output
//!
//! Detection happens once at startup behind [`EncodingDetector`]. The
//! resulting pair is stored in the immutable settings and never re-read.

use std::ffi::OsStr;
use std::fmt;

use encoding_rs::{Encoding, UTF_8};

use crate::core::error::DecodeError;
use crate::log_debug;

/// A named byte <-> text scheme
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Codepage {
    encoding: &'static Encoding,
}

impl Codepage {
    /// Resolve a label such as `utf-8`, `cp1251`, `koi8-r` or `cp866`
    pub fn from_label(label: &str) -> Result<Self, DecodeError> {
        Encoding::for_label(label.trim().as_bytes())
            .map(|encoding| Self { encoding })
            .ok_or_else(|| DecodeError::UnknownCodepage(label.to_string()))
    }

    pub fn utf8() -> Self {
        Self { encoding: UTF_8 }
    }

    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    pub fn is_utf8(&self) -> bool {
        self.encoding == UTF_8
    }

    /// Strict decode: any malformed sequence is an error
    pub fn decode(&self, bytes: &[u8]) -> Result<String, DecodeError> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(|text| text.into_owned())
            .ok_or_else(|| DecodeError::Malformed {
                codepage: self.name().to_string(),
            })
    }

    /// Characters the codepage cannot represent become numeric character references
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.is_utf8() {
            return text.as_bytes().to_vec();
        }
        let (bytes, _, _) = self.encoding.encode(text);
        bytes.into_owned()
    }
}

impl fmt::Debug for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Codepage").field(&self.name()).finish()
    }
}

impl fmt::Display for Codepage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Input and output codepages of the host terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encodings {
    pub input: Codepage,
    pub output: Codepage,
}

impl Default for Encodings {
    fn default() -> Self {
        Self {
            input: Codepage::utf8(),
            output: Codepage::utf8(),
        }
    }
}

pub trait EncodingDetector {
    fn detect_encodings(&self) -> Encodings;
}

/// Reads the codeset from `LC_ALL`, `LC_CTYPE` or `LANG`, first non-empty wins
pub struct LocaleDetector<F> {
    lookup: F,
}

impl LocaleDetector<fn(&str) -> Option<String>> {
    pub fn from_env() -> Self {
        Self {
            lookup: |name: &str| std::env::var(name).ok(),
        }
    }
}

impl<F> LocaleDetector<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn with_lookup(lookup: F) -> Self {
        Self { lookup }
    }

    fn locale(&self) -> Option<String> {
        ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .filter_map(|name| (self.lookup)(name))
            .find(|value| !value.is_empty())
    }
}

impl<F> EncodingDetector for LocaleDetector<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn detect_encodings(&self) -> Encodings {
        let Some(locale) = self.locale() else {
            return Encodings::default();
        };

        let codepage = codeset_of(&locale)
            .and_then(|codeset| match Codepage::from_label(codeset) {
                Ok(codepage) => Some(codepage),
                Err(e) => {
                    log_debug!("Locale {} has an unusable codeset: {}", locale, e);
                    None
                }
            })
            .unwrap_or_else(Codepage::utf8);

        log_debug!("Detected terminal codepage {} from locale {}", codepage, locale);

        // A Unix terminal reads and writes with the same codeset
        Encodings {
            input: codepage,
            output: codepage,
        }
    }
}

/// Windows hands argv over as UTF-16 and the console takes UTF-16 back,
/// so both sides are UTF-8 once inside the process.
pub struct Utf8Detector;

impl EncodingDetector for Utf8Detector {
    fn detect_encodings(&self) -> Encodings {
        Encodings::default()
    }
}

#[cfg(unix)]
pub fn platform_detector() -> Box<dyn EncodingDetector> {
    Box::new(LocaleDetector::from_env())
}

#[cfg(not(unix))]
pub fn platform_detector() -> Box<dyn EncodingDetector> {
    Box::new(Utf8Detector)
}

/// `ru_RU.KOI8-R@modifier` -> `KOI8-R`
fn codeset_of(locale: &str) -> Option<&str> {
    let (_, rest) = locale.split_once('.')?;
    let codeset = rest.split('@').next().unwrap_or(rest);
    (!codeset.is_empty()).then_some(codeset)
}

/// Raw bytes of a command-line argument as the terminal produced them
#[cfg(unix)]
pub fn os_arg_bytes(arg: &OsStr) -> Result<Vec<u8>, DecodeError> {
    use std::os::unix::ffi::OsStrExt;
    Ok(arg.as_bytes().to_vec())
}

/// Arguments arrive as UTF-16; unpaired surrogates cannot be decoded
#[cfg(not(unix))]
pub fn os_arg_bytes(arg: &OsStr) -> Result<Vec<u8>, DecodeError> {
    arg.to_str()
        .map(|text| text.as_bytes().to_vec())
        .ok_or_else(|| DecodeError::Malformed {
            codepage: UTF_8.name().to_string(),
        })
}
