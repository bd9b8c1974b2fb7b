// WHOIS Client - Response Cache
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

//! Whois responses cached per (server, query) with a fixed lifetime

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::{CACHE_MAP_SIZE, CacheConfig};
use crate::storage::lmdb::LmdbStorage;
use crate::log_debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedResponse {
    text: String,
    cached_at: u64,
}

impl CachedResponse {
    fn is_expired(&self, ttl: Duration, now: u64) -> bool {
        now.saturating_sub(self.cached_at) >= ttl.as_secs()
    }
}

pub struct ResponseCache {
    storage: LmdbStorage,
    ttl: Duration,
}

impl ResponseCache {
    pub fn open(config: &CacheConfig) -> Result<Self> {
        let storage = LmdbStorage::new(&config.dir, CACHE_MAP_SIZE)?;
        Ok(Self {
            storage,
            ttl: config.ttl,
        })
    }

    fn key(server: &str, query: &str) -> String {
        format!("{}|{}", server, query)
    }

    /// Fresh cached text, or `None` on a miss or an expired entry
    pub fn get(&self, server: &str, query: &str) -> Result<Option<String>> {
        let key = Self::key(server, query);
        let Some(json) = self.storage.get(&key)? else {
            log_debug!("Cache miss: {}", key);
            return Ok(None);
        };

        let entry: CachedResponse = serde_json::from_str(&json)?;
        if entry.is_expired(self.ttl, unix_now()) {
            log_debug!("Cache entry expired: {}", key);
            self.storage.delete(&key)?;
            return Ok(None);
        }

        log_debug!("Cache hit: {}", key);
        Ok(Some(entry.text))
    }

    pub fn put(&self, server: &str, query: &str, text: &str) -> Result<()> {
        let entry = CachedResponse {
            text: text.to_string(),
            cached_at: unix_now(),
        };
        self.storage
            .put(&Self::key(server, query), &serde_json::to_string(&entry)?)
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
