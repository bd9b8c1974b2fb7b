// WHOIS Client - Referral Extraction
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::config::DEFAULT_WHOIS_PORT;
use crate::services::servers::WhoisServer;

/// Response fields that point at a more authoritative server
const REFERRAL_FIELDS: &[&str] = &[
    "refer:",
    "whois server:",
    "registrar whois server:",
    "referralserver:",
];

/// First usable referral in a response
pub fn extract_referral(response: &str) -> Option<WhoisServer> {
    response.lines().find_map(|line| {
        let line = line.trim();
        let lower = line.to_ascii_lowercase();

        REFERRAL_FIELDS
            .iter()
            .find(|field| lower.starts_with(*field))
            .and_then(|field| parse_referral_value(&line[field.len()..]))
    })
}

fn parse_referral_value(value: &str) -> Option<WhoisServer> {
    let value = value.trim();
    let value = match value.split_once("://") {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case("whois") => rest,
        // rwhois, http and friends speak other protocols
        Some(_) => return None,
        None => value,
    };
    let value = value.trim_end_matches('/');

    if !is_host_spec(value) {
        return None;
    }

    Some(WhoisServer::parse(value, DEFAULT_WHOIS_PORT))
}

fn is_host_spec(value: &str) -> bool {
    !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':'))
}
