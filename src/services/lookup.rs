// WHOIS Client - Recursive Lookup
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! The lookup collaborator: picks a server, follows referrals and shapes
//! the result according to the query mode

use std::collections::HashSet;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::config::{LookupConfig, MAX_REFERRAL_DEPTH};
use crate::core::{Hop, LookupError, LookupResult, QueryMode};
use crate::services::cleanup::{is_not_found, strip_disclaimer};
use crate::services::referral::extract_referral;
use crate::services::servers::{WhoisServer, query_prefix, select_server};
use crate::services::whois::query_whois;
use crate::storage::ResponseCache;
use crate::{log_debug, log_warn};

/// `Ok(None)` means the lookup produced no result
#[async_trait]
pub trait Lookup {
    async fn lookup(
        &self,
        domain: &str,
        server: Option<&str>,
        mode: QueryMode,
    ) -> Result<Option<LookupResult>, LookupError>;
}

pub struct WhoisLookup {
    config: LookupConfig,
    cache: Option<ResponseCache>,
    next_source: AtomicUsize,
}

impl WhoisLookup {
    /// A cache that cannot be opened is reported and skipped
    pub fn new(config: LookupConfig) -> Self {
        let cache = config.cache.as_ref().and_then(|cache_config| {
            match ResponseCache::open(cache_config) {
                Ok(cache) => Some(cache),
                Err(e) => {
                    log_warn!("Response cache disabled: {}", e);
                    None
                }
            }
        });

        Self {
            config,
            cache,
            next_source: AtomicUsize::new(0),
        }
    }

    /// Round-robin over the configured source addresses
    fn next_source_address(&self) -> Option<IpAddr> {
        let sources = &self.config.source_addresses;
        if sources.is_empty() {
            return None;
        }
        let index = self.next_source.fetch_add(1, Ordering::Relaxed) % sources.len();
        Some(sources[index])
    }

    /// Raw response of one server, from the cache when possible
    async fn fetch(&self, domain: &str, server: &WhoisServer) -> Result<String, LookupError> {
        let name = server.display_name();

        if let Some(cache) = &self.cache {
            match cache.get(&name, domain) {
                Ok(Some(text)) => return Ok(text),
                Ok(None) => {}
                Err(e) => log_warn!("Cache read failed for {}: {}", domain, e),
            }
        }

        let query = format!("{}{}", query_prefix(&server.host, domain), domain);
        let text = query_whois(&query, server, self.next_source_address(), self.config.timeout).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.put(&name, domain, &text) {
                log_warn!("Cache write failed for {}: {}", domain, e);
            }
        }

        Ok(text)
    }

    /// Responses along the referral chain, in the order they were received
    async fn follow_chain(
        &self,
        domain: &str,
        first: WhoisServer,
        mode: QueryMode,
    ) -> Result<Vec<Hop>, LookupError> {
        let mut hops: Vec<Hop> = Vec::new();
        let mut visited = HashSet::new();
        let mut current = first;

        loop {
            visited.insert(current.clone());

            let text = match self.fetch(domain, &current).await {
                Ok(text) => text,
                Err(e) if hops.is_empty() => return Err(e),
                Err(e) => {
                    log_warn!("Referral to {} failed: {}", current.display_name(), e);
                    break;
                }
            };

            let referral = if mode.follows_referrals() && hops.len() + 1 < MAX_REFERRAL_DEPTH {
                extract_referral(&text)
            } else {
                None
            };

            hops.push(Hop::new(text, current.display_name()));

            match referral {
                Some(next) if !visited.contains(&next) => {
                    log_debug!("Following referral to {}", next.display_name());
                    current = next;
                }
                _ => break,
            }
        }

        Ok(hops)
    }
}

#[async_trait]
impl Lookup for WhoisLookup {
    async fn lookup(
        &self,
        domain: &str,
        server: Option<&str>,
        mode: QueryMode,
    ) -> Result<Option<LookupResult>, LookupError> {
        let first = match server {
            Some(server) => WhoisServer::parse(server, self.config.port),
            None => select_server(domain, self.config.port),
        };
        log_debug!("Starting lookup of {} at {}", domain, first.display_name());

        let mut hops = self.follow_chain(domain, first, mode).await?;

        if self.config.fail_fast && hops.last().is_some_and(|hop| is_not_found(&hop.text)) {
            log_debug!("Final response for {} says not found", domain);
            return Ok(None);
        }

        if self.config.strip_disclaimer {
            for hop in &mut hops {
                hop.text = strip_disclaimer(&hop.text);
            }
        }

        let result = match mode.effective() {
            QueryMode::All => Some(LookupResult::Chain(hops)),
            QueryMode::First => hops.into_iter().next().map(LookupResult::Single),
            _ => hops.pop().map(LookupResult::Single),
        };

        Ok(result)
    }
}
