//! # WHOIS Client Library
//!
//! The query pipeline behind the `whois-client` binary:
//! - Normalization of user input: codepage decoding, Latin/Cyrillic case
//!   folding and per-label punycode (`Пример.Рф` -> `xn--e1afmkfd.xn--p1ai`)
//! - Syntactic validation before any network traffic
//! - Recursive WHOIS lookup following registry and registrar referrals
//! - Selection of the first, last or every hop of the referral chain
//!
//! ## Quick Start
//!
//! ```no_run
//! use whois_client::query;
//! use whois_client::core::QueryMode;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let output = query("Пример.Рф", QueryMode::Last).await?;
//!     print!("{}", output);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod services;
pub mod storage;

pub use self::core::{LookupResult, QueryMode, WhoisError, normalize, select, validate};
pub use self::services::{Lookup, WhoisLookup};

use crate::config::LookupConfig;
use crate::core::{Codepage, Hop, check, render_text};

/// Normalize, validate, look up and select, stopping at the first failure
pub async fn run_query<L: Lookup + Sync>(
    raw: &[u8],
    input: Codepage,
    server: Option<&str>,
    mode: QueryMode,
    lookup: &L,
) -> Result<Vec<Hop>, WhoisError> {
    let domain = normalize(raw, input)?;

    check(&domain).map_err(|rejection| WhoisError::InvalidDomain {
        name: domain.clone(),
        rejection,
    })?;

    match lookup.lookup(&domain, server, mode).await? {
        Some(result) => Ok(select(result, mode)),
        None => Err(WhoisError::LookupFailed(domain)),
    }
}

/// Query a UTF-8 name with default settings and return the rendered text
pub async fn query(input: &str, mode: QueryMode) -> Result<String, WhoisError> {
    let lookup = WhoisLookup::new(LookupConfig::default());
    let hops = run_query(input.as_bytes(), Codepage::utf8(), None, mode, &lookup).await?;
    Ok(render_text(&hops))
}
