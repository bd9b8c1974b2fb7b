// WHOIS Client - Domain Normalizer
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Turns raw command-line bytes into an ASCII-compatible query
//!
//! The pipeline is decode, then case-fold, then per-label ACE conversion.
//! Only decoding depends on the environment (the input codepage); the other
//! two steps are pure string transforms.

use std::net::IpAddr;

use crate::core::encoding::Codepage;
use crate::core::error::DecodeError;
use crate::log_debug;

pub const ACE_PREFIX: &str = "xn--";
pub const LABEL_DELIMITER: char = '.';

/// Decode, case-fold and ACE-convert a raw domain argument
pub fn normalize(raw: &[u8], input: Codepage) -> Result<String, DecodeError> {
    let decoded = input.decode(raw)?;
    let folded = fold_case(&decoded);

    // Address literals are routed by value, never punycoded
    if folded.parse::<IpAddr>().is_ok() {
        return Ok(folded);
    }

    let ascii = to_ace(&folded)?;

    if ascii != decoded {
        log_debug!("Normalized {:?} to {:?} ({} input)", decoded, ascii, input);
    }

    Ok(ascii)
}

/// Lowercase ASCII Latin and Cyrillic letters with a fixed table.
///
/// Covers `A-Z`, the basic Cyrillic capitals `А-Я` and the extended block
/// U+0400..U+040F (`Ё`, `Є`, `І`, `Ї`, `Ў`, `Ђ` and friends) carried by
/// cp1251 and koi8-u. Every other character is left alone.
pub fn fold_case(text: &str) -> String {
    text.chars().map(fold_char).collect()
}

fn fold_char(c: char) -> char {
    let offset = match c {
        'A'..='Z' => 0x20,
        '\u{0410}'..='\u{042F}' => 0x20,
        '\u{0400}'..='\u{040F}' => 0x50,
        _ => return c,
    };
    char::from_u32(c as u32 + offset).unwrap_or(c)
}

/// Characters a label may keep without conversion
pub fn is_ace_char(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '-')
}

/// Punycode each label that leaves `[a-z0-9-]`, keep the rest verbatim
pub fn to_ace(name: &str) -> Result<String, DecodeError> {
    let labels = name
        .split(LABEL_DELIMITER)
        .map(label_to_ace)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(labels.join(LABEL_DELIMITER.to_string().as_str()))
}

fn label_to_ace(label: &str) -> Result<String, DecodeError> {
    if label.chars().all(is_ace_char) {
        return Ok(label.to_string());
    }

    idna::punycode::encode_str(label)
        .map(|encoded| format!("{}{}", ACE_PREFIX, encoded))
        .ok_or_else(|| DecodeError::AceEncoding(label.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_latin_and_cyrillic() {
        assert_eq!(fold_case("ExAmPlE.COM"), "example.com");
        assert_eq!(fold_case("Пример.Рф"), "пример.рф");
        assert_eq!(fold_case("ЁЖИК"), "ёжик");
        assert_eq!(fold_case("ЇЖАК.УКР"), "їжак.укр");
        assert_eq!(fold_case("ЎЂЏ"), "ўђџ");
    }

    #[test]
    fn test_fold_leaves_other_scripts() {
        assert_eq!(fold_case("ÄÖÜ.DE"), "ÄÖÜ.de");
        assert_eq!(fold_case("中国"), "中国");
        assert_eq!(fold_case("ΑΒΓ"), "ΑΒΓ");
    }

    #[test]
    fn test_fold_is_idempotent() {
        for input in ["Пример.Рф", "MiXeD-ЁлКа.COM", "ÄÖÜ", "", "ЀЏАЯ", "already.lower"] {
            let once = fold_case(input);
            assert_eq!(fold_case(&once), once, "input {:?}", input);
        }
    }

    #[test]
    fn test_ace_passthrough() {
        for input in ["example.com", "a-b.c-d.e", "123.45", "com", "", "..", "xn--p1ai"] {
            assert_eq!(to_ace(input).unwrap(), input);
        }
    }

    #[test]
    fn test_ace_per_label() {
        assert_eq!(to_ace("пример.рф").unwrap(), "xn--e1afmkfd.xn--p1ai");
        assert_eq!(to_ace("shop.рф").unwrap(), "shop.xn--p1ai");
        assert_eq!(to_ace("münchen.de").unwrap(), "xn--mnchen-3ya.de");
    }

    #[test]
    fn test_normalize_pipeline() {
        let utf8 = Codepage::utf8();
        assert_eq!(
            normalize("Пример.Рф".as_bytes(), utf8).unwrap(),
            "xn--e1afmkfd.xn--p1ai"
        );
        assert_eq!(normalize(b"Example.COM", utf8).unwrap(), "example.com");
    }

    #[test]
    fn test_normalize_keeps_ip_literals() {
        let utf8 = Codepage::utf8();
        assert_eq!(normalize(b"2001:db8::1", utf8).unwrap(), "2001:db8::1");
        assert_eq!(normalize(b"2001:DB8::A", utf8).unwrap(), "2001:db8::a");
        assert_eq!(normalize(b"192.0.2.1", utf8).unwrap(), "192.0.2.1");
    }

    #[test]
    fn test_normalize_legacy_codepage() {
        let cp1251 = Codepage::from_label("cp1251").unwrap();
        // "Пример.Рф" in windows-1251
        let raw = [0xCF, 0xF0, 0xE8, 0xEC, 0xE5, 0xF0, b'.', 0xD0, 0xF4];
        assert_eq!(normalize(&raw, cp1251).unwrap(), "xn--e1afmkfd.xn--p1ai");
    }

    #[test]
    fn test_normalize_rejects_bad_bytes() {
        assert!(matches!(
            normalize(&[0xC3, 0x28], Codepage::utf8()),
            Err(DecodeError::Malformed { .. })
        ));
    }
}
