// WHOIS Client - Server Selection
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::net::IpAddr;

use crate::config::{ARIN_WHOIS_SERVER, DEFAULT_WHOIS_PORT, IANA_WHOIS_SERVER};

/// A whois endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WhoisServer {
    pub host: String,
    pub port: u16,
}

impl WhoisServer {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into().trim().to_lowercase(),
            port,
        }
    }

    /// `host` or `host:port`; a bare IPv6 address keeps its colons
    pub fn parse(spec: &str, default_port: u16) -> Self {
        let spec = spec.trim();
        match spec.rsplit_once(':') {
            Some((host, port)) if !host.contains(':') => match port.parse() {
                Ok(port) => Self::new(host, port),
                Err(_) => Self::new(spec, default_port),
            },
            _ => Self::new(spec, default_port),
        }
    }

    /// Name shown in the `[server]` header; the port only when non-standard
    pub fn display_name(&self) -> String {
        if self.port == DEFAULT_WHOIS_PORT {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Registries for well-known TLDs; everything else goes through IANA
const TLD_SERVERS: &[(&str, &str)] = &[
    ("com", "whois.verisign-grs.com"),
    ("net", "whois.verisign-grs.com"),
    ("org", "whois.pir.org"),
    ("ru", "whois.tcinet.ru"),
    ("su", "whois.tcinet.ru"),
    ("xn--p1ai", "whois.tcinet.ru"),
    ("de", "whois.denic.de"),
    ("uk", "whois.nic.uk"),
    ("jp", "whois.jprs.jp"),
    ("cn", "whois.cnnic.cn"),
    ("fr", "whois.nic.fr"),
    ("nl", "whois.domain-registry.nl"),
    ("eu", "whois.eu"),
    ("io", "whois.nic.io"),
    ("me", "whois.nic.me"),
    ("ua", "whois.ua"),
];

/// Text some servers expect in front of the query
pub fn query_prefix(server: &str, query: &str) -> &'static str {
    match server {
        "whois.verisign-grs.com" => "domain ",
        "whois.denic.de" => "-T dn,ace ",
        ARIN_WHOIS_SERVER if query.parse::<IpAddr>().is_ok() => "n + ",
        _ => "",
    }
}

/// AS numbers like `AS13335` or `as65000`
pub fn is_asn(query: &str) -> bool {
    match (query.get(..2), query.get(2..)) {
        (Some(prefix), Some(number)) => {
            prefix.eq_ignore_ascii_case("as")
                && !number.is_empty()
                && number.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// First server to ask for an already normalized query
pub fn select_server(query: &str, port: u16) -> WhoisServer {
    if query.parse::<IpAddr>().is_ok() || is_asn(query) {
        return WhoisServer::new(ARIN_WHOIS_SERVER, port);
    }

    let tld = match query.rsplit_once('.') {
        Some((_, tld)) => tld,
        // Bare TLDs are answered by IANA itself
        None => return WhoisServer::new(IANA_WHOIS_SERVER, port),
    };

    TLD_SERVERS
        .iter()
        .find(|(suffix, _)| *suffix == tld)
        .map(|(_, server)| WhoisServer::new(*server, port))
        .unwrap_or_else(|| WhoisServer::new(IANA_WHOIS_SERVER, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_by_tld() {
        assert_eq!(select_server("example.com", 43).host, "whois.verisign-grs.com");
        assert_eq!(select_server("xn--e1afmkfd.xn--p1ai", 43).host, "whois.tcinet.ru");
        assert_eq!(select_server("a.b.example.de", 43).host, "whois.denic.de");
        assert_eq!(select_server("example.museum", 43).host, IANA_WHOIS_SERVER);
        assert_eq!(select_server("com", 43).host, IANA_WHOIS_SERVER);
    }

    #[test]
    fn test_select_numbers() {
        assert_eq!(select_server("192.0.2.1", 43).host, ARIN_WHOIS_SERVER);
        assert_eq!(select_server("2001:db8::1", 43).host, ARIN_WHOIS_SERVER);
        assert_eq!(select_server("as13335", 43).host, ARIN_WHOIS_SERVER);
        assert!(!is_asn("as"));
        assert!(!is_asn("asia"));
    }

    #[test]
    fn test_query_prefix() {
        assert_eq!(query_prefix("whois.verisign-grs.com", "example.com"), "domain ");
        assert_eq!(query_prefix("whois.arin.net", "192.0.2.1"), "n + ");
        assert_eq!(query_prefix("whois.arin.net", "as13335"), "");
        assert_eq!(query_prefix("whois.iana.org", "com"), "");
    }

    #[test]
    fn test_parse_server_spec() {
        assert_eq!(WhoisServer::parse("Whois.Example.NET", 43), WhoisServer::new("whois.example.net", 43));
        assert_eq!(WhoisServer::parse("rwhois.example.net:4321", 43).port, 4321);
        assert_eq!(WhoisServer::parse("2001:db8::43", 43).host, "2001:db8::43");
        assert_eq!(WhoisServer::new("localhost", 4343).display_name(), "localhost:4343");
        assert_eq!(WhoisServer::new("whois.iana.org", 43).display_name(), "whois.iana.org");
    }
}
