//! Storage driver contract.

use async_trait::async_trait;

use crate::error::StorageError;

/// Scalar and sorted-set primitives every storage backend implements.
///
/// The connection is established lazily on the first call; concurrent first
/// callers share a single connection. `close` releases it. Drivers perform
/// no retries and no error translation.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Get a scalar value.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Set a scalar value.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a key.
    async fn del(&self, key: &str) -> Result<(), StorageError>;

    /// Increment an integer counter, returning the new value.
    /// A missing key counts from zero.
    async fn incr(&self, key: &str) -> Result<i64, StorageError>;

    /// Add a member to a sorted set with the given score.
    /// Re-adding an existing member replaces its score.
    async fn zadd(&self, set: &str, score: u64, member: &str) -> Result<(), StorageError>;

    /// Read members ascending by score, honoring offset and limit.
    async fn zrange(
        &self,
        set: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>, StorageError>;

    /// Number of members in a sorted set.
    async fn zcard(&self, set: &str) -> Result<usize, StorageError>;

    /// Release the underlying connection.
    async fn close(&self) -> Result<(), StorageError>;
}
