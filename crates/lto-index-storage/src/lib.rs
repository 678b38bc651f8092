//! LTO Indexer Storage — key-value and sorted-set persistence.
//!
//! Two levels: a [`Driver`] exposes scalar and sorted-set primitives
//! (RocksDB in production, in-memory for tests), and [`Storage`] exposes the
//! semantic contract the indexers and resolvers use. This layer holds no
//! business logic; failures propagate unmodified.

pub mod driver;
pub mod error;
pub mod memory;
#[cfg(feature = "rocks")]
pub mod rocks;
pub mod service;

pub use driver::Driver;
pub use error::StorageError;
pub use memory::MemoryDriver;
#[cfg(feature = "rocks")]
pub use rocks::RocksDbDriver;
pub use service::{Associations, Storage};
