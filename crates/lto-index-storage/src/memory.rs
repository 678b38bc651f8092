//! In-memory storage driver for tests.

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::{BTreeSet, HashMap};
use std::sync::Mutex;

use crate::driver::Driver;
use crate::error::StorageError;

#[derive(Default)]
struct ZSet {
    by_score: BTreeSet<(u64, String)>,
    scores: HashMap<String, u64>,
}

/// In-memory driver. There is no connection to establish or release.
#[derive(Default)]
pub struct MemoryDriver {
    kv: DashMap<String, String>,
    zsets: Mutex<HashMap<String, ZSet>>,
}

impl MemoryDriver {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Driver for MemoryDriver {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.kv.get(key).map(|entry| entry.value().clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.kv.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn del(&self, key: &str) -> Result<(), StorageError> {
        self.kv.remove(key);
        Ok(())
    }

    async fn incr(&self, key: &str) -> Result<i64, StorageError> {
        let mut entry = self.kv.entry(key.to_string()).or_insert_with(|| "0".into());
        let next = entry
            .value()
            .parse::<i64>()
            .map_err(|_| StorageError::NotACounter(key.to_string()))?
            + 1;
        *entry.value_mut() = next.to_string();
        Ok(next)
    }

    async fn zadd(&self, set: &str, score: u64, member: &str) -> Result<(), StorageError> {
        let mut zsets = self.zsets.lock().expect("zset lock");
        let zset = zsets.entry(set.to_string()).or_default();
        if let Some(old) = zset.scores.insert(member.to_string(), score) {
            zset.by_score.remove(&(old, member.to_string()));
        }
        zset.by_score.insert((score, member.to_string()));
        Ok(())
    }

    async fn zrange(
        &self,
        set: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>, StorageError> {
        let zsets = self.zsets.lock().expect("zset lock");
        Ok(zsets
            .get(set)
            .map(|zset| {
                zset.by_score
                    .iter()
                    .skip(offset)
                    .take(limit)
                    .map(|(_, member)| member.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn zcard(&self, set: &str) -> Result<usize, StorageError> {
        let zsets = self.zsets.lock().expect("zset lock");
        Ok(zsets.get(set).map(|zset| zset.scores.len()).unwrap_or(0))
    }

    async fn close(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
