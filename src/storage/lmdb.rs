// WHOIS Client - LMDB Storage
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;
use std::path::Path;

use anyhow::Result;
use lmdb::{Database, Environment, Transaction, WriteFlags};

use crate::{log_debug, log_warn};

/// Single-database LMDB key/value store
#[derive(Debug)]
pub struct LmdbStorage {
    env: Environment,
    db: Database,
}

impl LmdbStorage {
    /// Open (and create if needed) the environment directory at `db_path`
    pub fn new(db_path: &Path, map_size: usize) -> Result<Self> {
        // LMDB expects a directory, not a file
        if !db_path.exists() {
            fs::create_dir_all(db_path).map_err(|e| {
                anyhow::anyhow!("Failed to create LMDB directory {}: {}", db_path.display(), e)
            })?;
            log_debug!("Created LMDB directory: {}", db_path.display());
        }

        let env = Environment::new()
            .set_map_size(map_size)
            .set_max_dbs(1)
            .open(db_path)
            .map_err(|e| {
                anyhow::anyhow!("Failed to open LMDB environment at {}: {}", db_path.display(), e)
            })?;

        let db = env.open_db(None)?;

        log_debug!("LMDB storage opened at: {}", db_path.display());

        Ok(LmdbStorage { env, db })
    }

    pub fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut txn = self.env.begin_rw_txn()?;
        txn.put(self.db, &key, &value, WriteFlags::empty())?;
        txn.commit()?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let txn = self.env.begin_ro_txn()?;
        match txn.get(self.db, &key) {
            Ok(bytes) => Ok(Some(std::str::from_utf8(bytes)?.to_string())),
            Err(lmdb::Error::NotFound) => Ok(None),
            Err(e) => {
                log_warn!("LMDB: Error reading key '{}': {}", key, e);
                Err(e.into())
            }
        }
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        let mut txn = self.env.begin_rw_txn()?;
        match txn.del(self.db, &key, None) {
            Ok(()) | Err(lmdb::Error::NotFound) => {}
            Err(e) => return Err(e.into()),
        }
        txn.commit()?;
        Ok(())
    }
}
