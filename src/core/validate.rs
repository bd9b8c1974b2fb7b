// WHOIS Client - Domain Validator
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Syntactic gate in front of the network lookup
//!
//! The name is split once at its last dot into a name part and a TLD. Each
//! rule looks at that split and either passes, accepts early or rejects.
//! Rules run in order; the first decisive one wins.

use thiserror::Error;

use crate::core::normalize::{ACE_PREFIX, LABEL_DELIMITER};

/// Why a name was turned away
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationRejection {
    #[error("empty name")]
    Empty,
    #[error("name starts with a hyphen")]
    LeadingHyphen,
    #[error("name ends with a hyphen")]
    TrailingHyphen,
    #[error("hyphens in positions 3 and 4 without the xn-- prefix")]
    FalseAcePrefix,
}

/// A name split at its last dot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NameParts<'a> {
    pub full: &'a str,
    /// Everything before the last dot, possibly containing more dots
    pub name: &'a str,
    pub tld: &'a str,
}

impl<'a> NameParts<'a> {
    pub fn split(full: &'a str) -> Self {
        match full.rsplit_once(LABEL_DELIMITER) {
            Some((name, tld)) => Self { full, name, tld },
            None => Self { full, name: "", tld: full },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleOutcome {
    Pass,
    Accept,
    Reject(ValidationRejection),
}

pub type Rule = fn(&NameParts<'_>) -> RuleOutcome;

/// Evaluated top to bottom
pub const RULES: &[(&str, Rule)] = &[
    ("non-empty", rule_non_empty),
    ("bare-tld", rule_bare_tld),
    ("leading-hyphen", rule_leading_hyphen),
    ("trailing-hyphen", rule_trailing_hyphen),
    ("false-ace-prefix", rule_false_ace_prefix),
];

fn rule_non_empty(parts: &NameParts<'_>) -> RuleOutcome {
    if parts.full.is_empty() {
        RuleOutcome::Reject(ValidationRejection::Empty)
    } else {
        RuleOutcome::Pass
    }
}

/// Querying a TLD on its own is a legitimate lookup
fn rule_bare_tld(parts: &NameParts<'_>) -> RuleOutcome {
    if parts.name.is_empty() {
        RuleOutcome::Accept
    } else {
        RuleOutcome::Pass
    }
}

fn rule_leading_hyphen(parts: &NameParts<'_>) -> RuleOutcome {
    if parts.name.starts_with('-') {
        RuleOutcome::Reject(ValidationRejection::LeadingHyphen)
    } else {
        RuleOutcome::Pass
    }
}

fn rule_trailing_hyphen(parts: &NameParts<'_>) -> RuleOutcome {
    if parts.name.ends_with('-') {
        RuleOutcome::Reject(ValidationRejection::TrailingHyphen)
    } else {
        RuleOutcome::Pass
    }
}

/// `ab--foo` looks like a mangled ACE label. Only the leading position is
/// inspected; hyphen pairs further in are allowed.
fn rule_false_ace_prefix(parts: &NameParts<'_>) -> RuleOutcome {
    let mut chars = parts.name.chars().skip(2);
    let hyphens_at_3_and_4 = chars.next() == Some('-') && chars.next() == Some('-');

    if hyphens_at_3_and_4 && !parts.full.starts_with(ACE_PREFIX) {
        RuleOutcome::Reject(ValidationRejection::FalseAcePrefix)
    } else {
        RuleOutcome::Pass
    }
}

/// Run the rules and report the first rejection
pub fn check(name: &str) -> Result<(), ValidationRejection> {
    let parts = NameParts::split(name);

    for (_, rule) in RULES {
        match rule(&parts) {
            RuleOutcome::Pass => continue,
            RuleOutcome::Accept => return Ok(()),
            RuleOutcome::Reject(rejection) => return Err(rejection),
        }
    }

    Ok(())
}

pub fn validate(name: &str) -> bool {
    check(name).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_uses_last_dot() {
        let parts = NameParts::split("a.b.example");
        assert_eq!(parts.name, "a.b");
        assert_eq!(parts.tld, "example");

        let parts = NameParts::split("com");
        assert_eq!(parts.name, "");
        assert_eq!(parts.tld, "com");
    }

    #[test]
    fn test_concrete_cases() {
        assert!(validate("com"));
        assert!(validate("example.com"));
        assert!(validate("a.b.example"));
        assert!(validate("xn--p1ai.com"));
        assert!(validate("xn--e1afmkfd.xn--p1ai"));
        assert!(validate("192.0.2.1"));

        assert_eq!(check(""), Err(ValidationRejection::Empty));
        assert_eq!(check("-foo.com"), Err(ValidationRejection::LeadingHyphen));
        assert_eq!(check("foo-.com"), Err(ValidationRejection::TrailingHyphen));
        assert_eq!(check("ab--foo.com"), Err(ValidationRejection::FalseAcePrefix));
    }

    #[test]
    fn test_bare_tld_short_circuits() {
        // No dot means no name part, so the hyphen rules never fire
        assert!(validate("-com"));
        assert!(validate(".com"));
        assert!(validate("xn--p1ai"));
    }

    #[test]
    fn test_false_ace_prefix_is_anchored() {
        assert!(validate("abc--d.com"));
        assert!(validate("a--b.com"));
        assert_eq!(check("ab--c.d.com"), Err(ValidationRejection::FalseAcePrefix));
        // The exemption looks at the whole name, not the name part
        assert_eq!(check("sub.ab--x.com"), Ok(()));
        assert_eq!(check("xn--80a.ab--x.com"), Ok(()));
    }

    #[test]
    fn test_hyphen_rules_treat_name_part_as_one_unit() {
        assert!(validate("foo.-bar.com"));
        assert_eq!(check("foo.bar-.com"), Err(ValidationRejection::TrailingHyphen));
    }

    #[test]
    fn test_validate_is_total() {
        for input in ["", ".", "..", "-", "--", "-.-", "a", "a.", ".a", "ab--", "é.com"] {
            let _ = validate(input);
        }
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<&str> = RULES.iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            ["non-empty", "bare-tld", "leading-hyphen", "trailing-hyphen", "false-ace-prefix"]
        );
    }
}
