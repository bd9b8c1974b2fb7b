// WHOIS Client - Configuration
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::ffi::OsString;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgGroup, Parser};

use crate::core::{Codepage, DecodeError, Encodings, QueryMode};

// WHOIS protocol constants
pub const DEFAULT_WHOIS_PORT: u16 = 43;
pub const IANA_WHOIS_SERVER: &str = "whois.iana.org";
pub const ARIN_WHOIS_SERVER: &str = "whois.arin.net";
pub const TIMEOUT_SECONDS: u64 = 10;
pub const MAX_RESPONSE_BYTES: usize = 1_000_000; // 1MB
pub const MAX_REFERRAL_DEPTH: usize = 5;

// Response cache
pub const CACHE_DIR_NAME: &str = "whois-client-cache";
pub const CACHE_TIME_MINUTES: u64 = 60;
pub const CACHE_MAP_SIZE: usize = 64 * 1024 * 1024; // 64MB

#[derive(Parser, Debug)]
#[command(author, version, about = "A WHOIS client with IDN support")]
#[command(group(ArgGroup::new("mode").args(["first", "last", "all"])))]
pub struct Cli {
    /// Domain name, IP address or AS number to query
    pub domain: OsString,

    /// WHOIS server to ask instead of the automatically selected one
    pub server: Option<String>,

    /// Strip disclaimers and legal notices from responses
    #[arg(short, long)]
    pub strip: bool,

    /// Treat "not found" responses as a failed lookup
    #[arg(short = 'c', long = "fail-fast")]
    pub fail_fast: bool,

    /// Enable debug output
    #[arg(short, long)]
    pub debug: bool,

    /// Network timeout in seconds
    #[arg(short = 'T', long, default_value_t = TIMEOUT_SECONDS)]
    pub timeout: u64,

    /// Source address for outgoing connections (repeat to rotate between several)
    #[arg(short = 'a', long = "src-addr")]
    pub src_addr: Vec<IpAddr>,

    /// Cache responses between runs
    #[arg(long)]
    pub enable_caching: bool,

    /// Cache directory (default: <temp dir>/whois-client-cache)
    #[arg(long)]
    pub cache_dir: Option<PathBuf>,

    /// Cache lifetime in minutes
    #[arg(long, default_value_t = CACHE_TIME_MINUTES)]
    pub cache_time: u64,

    /// Show only the first server's response
    #[arg(short = 'F', long)]
    pub first: bool,

    /// Show only the last server's response (default)
    #[arg(short = 'L', long)]
    pub last: bool,

    /// Show every server's response along the referral chain
    #[arg(short = 'A', long)]
    pub all: bool,

    /// Codepage of the command line (default: detected from the locale)
    #[arg(long)]
    pub input_encoding: Option<String>,

    /// Codepage of the terminal output (default: detected from the locale)
    #[arg(long)]
    pub output_encoding: Option<String>,
}

impl Cli {
    pub fn query_mode(&self) -> QueryMode {
        if self.first {
            QueryMode::First
        } else if self.last {
            QueryMode::Last
        } else if self.all {
            QueryMode::All
        } else {
            QueryMode::Unspecified
        }
    }
}

/// Settings handed to the lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    pub timeout: Duration,
    pub source_addresses: Vec<IpAddr>,
    pub strip_disclaimer: bool,
    pub fail_fast: bool,
    /// `None` disables caching
    pub cache: Option<CacheConfig>,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    pub dir: PathBuf,
    pub ttl: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(TIMEOUT_SECONDS),
            source_addresses: Vec::new(),
            strip_disclaimer: false,
            fail_fast: false,
            cache: None,
            port: DEFAULT_WHOIS_PORT,
        }
    }
}

/// Everything resolved once at startup and read-only afterwards
#[derive(Debug, Clone)]
pub struct Settings {
    pub raw_domain: Vec<u8>,
    pub server: Option<String>,
    pub mode: QueryMode,
    pub encodings: Encodings,
    pub lookup: LookupConfig,
}

impl Settings {
    /// Combine parsed arguments with the detected codepages. Explicit
    /// `--input-encoding`/`--output-encoding` win over detection.
    pub fn from_cli(cli: &Cli, detected: Encodings) -> Result<Self, DecodeError> {
        let encodings = Encodings {
            input: override_codepage(cli.input_encoding.as_deref(), detected.input)?,
            output: override_codepage(cli.output_encoding.as_deref(), detected.output)?,
        };

        let cache = cli.enable_caching.then(|| CacheConfig {
            dir: cli
                .cache_dir
                .clone()
                .unwrap_or_else(|| std::env::temp_dir().join(CACHE_DIR_NAME)),
            ttl: Duration::from_secs(cli.cache_time.saturating_mul(60)),
        });

        Ok(Self {
            raw_domain: crate::core::os_arg_bytes(&cli.domain)?,
            server: cli.server.clone().filter(|server| !server.trim().is_empty()),
            mode: cli.query_mode(),
            encodings,
            lookup: LookupConfig {
                timeout: Duration::from_secs(cli.timeout),
                source_addresses: cli.src_addr.clone(),
                strip_disclaimer: cli.strip,
                fail_fast: cli.fail_fast,
                cache,
                port: DEFAULT_WHOIS_PORT,
            },
        })
    }
}

fn override_codepage(label: Option<&str>, detected: Codepage) -> Result<Codepage, DecodeError> {
    match label {
        Some(label) => Codepage::from_label(label),
        None => Ok(detected),
    }
}
