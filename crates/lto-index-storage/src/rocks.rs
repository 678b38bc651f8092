//! RocksDB storage driver.
//!
//! Sorted sets are laid out over the flat keyspace: an order key
//! `z:{set}:{score:020}:{member}` gives lexicographic iteration in score
//! order, and a member key `m:{set}:{member}` holds the current score so a
//! re-add can retire the stale order key.

use async_trait::async_trait;
use rocksdb::{Direction, IteratorMode, Options, DB};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::driver::Driver;
use crate::error::StorageError;

const SCORE_WIDTH: usize = 20;

/// RocksDB-backed driver. The database is opened lazily on first use.
pub struct RocksDbDriver {
    path: PathBuf,
    db: RwLock<Option<Arc<DB>>>,
}

impl RocksDbDriver {
    /// Create a driver rooted at the given data directory.
    /// No connection is made until the first call.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            db: RwLock::new(None),
        }
    }

    async fn db(&self) -> Result<Arc<DB>, StorageError> {
        {
            let guard = self.db.read().await;
            if let Some(db) = guard.as_ref() {
                return Ok(db.clone());
            }
        }

        let mut guard = self.db.write().await;
        // Another first-caller may have connected while we waited.
        if let Some(db) = guard.as_ref() {
            return Ok(db.clone());
        }

        std::fs::create_dir_all(&self.path)?;
        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = Arc::new(DB::open(&opts, &self.path)?);
        tracing::debug!(path = %self.path.display(), "opened rocksdb connection");
        *guard = Some(db.clone());
        Ok(db)
    }

    fn order_key(set: &str, score: u64, member: &str) -> String {
        format!("z:{set}:{score:0width$}:{member}", width = SCORE_WIDTH)
    }

    fn member_key(set: &str, member: &str) -> String {
        format!("m:{set}:{member}")
    }
}

#[async_trait]
impl Driver for RocksDbDriver {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self.db().await?;
        match db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|_| StorageError::Encoding(key.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self.db().await?;
        db.put(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StorageError> {
        let db = self.db().await?;
        db.delete(key.as_bytes())?;
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StorageError> {
        let db = self.db().await?;
        let current = match db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes)
                .map_err(|_| StorageError::Encoding(key.to_string()))?
                .parse::<i64>()
                .map_err(|_| StorageError::NotACounter(key.to_string()))?,
            None => 0,
        };
        let next = current + 1;
        db.put(key.as_bytes(), next.to_string().as_bytes())?;
        Ok(next)
    }

    async fn zadd(&self, set: &str, score: u64, member: &str) -> Result<(), StorageError> {
        let db = self.db().await?;
        let member_key = Self::member_key(set, member);

        // Retire the stale order key when the member is re-scored.
        if let Some(bytes) = db.get(member_key.as_bytes())? {
            let old = String::from_utf8(bytes)
                .map_err(|_| StorageError::Encoding(member_key.clone()))?
                .parse::<u64>()
                .map_err(|_| StorageError::NotACounter(member_key.clone()))?;
            if old != score {
                db.delete(Self::order_key(set, old, member).as_bytes())?;
            }
        }

        db.put(Self::order_key(set, score, member).as_bytes(), b"")?;
        db.put(member_key.as_bytes(), score.to_string().as_bytes())?;
        Ok(())
    }

    async fn zrange(
        &self,
        set: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>, StorageError> {
        let db = self.db().await?;
        let prefix = format!("z:{set}:");
        let mut members = Vec::new();

        let iter = db.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));
        let mut skipped = 0;
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            if skipped < offset {
                skipped += 1;
                continue;
            }
            if members.len() == limit {
                break;
            }
            let key = String::from_utf8(key.into_vec())
                .map_err(|_| StorageError::Encoding(prefix.clone()))?;
            // After the prefix: zero-padded score, a separator, then the member.
            members.push(key[prefix.len() + SCORE_WIDTH + 1..].to_string());
        }

        Ok(members)
    }

    async fn zcard(&self, set: &str) -> Result<usize, StorageError> {
        let db = self.db().await?;
        let prefix = format!("m:{set}:");
        let mut count = 0;

        let iter = db.iterator(IteratorMode::From(prefix.as_bytes(), Direction::Forward));
        for item in iter {
            let (key, _) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            count += 1;
        }

        Ok(count)
    }

    async fn close(&self) -> Result<(), StorageError> {
        let mut guard = self.db.write().await;
        if guard.take().is_some() {
            tracing::debug!(path = %self.path.display(), "closed rocksdb connection");
        }
        Ok(())
    }
}
