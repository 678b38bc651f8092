//! LTO Indexer Core — Fundamental types, role table, and configuration for
//! the LTO off-chain indexer.

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    ApiConfig, AssociationConfig, AssociationIndexMode, IndexerConfig, LoggingConfig,
    NodeApiConfig, RoleConfig, RoleEntry, StorageConfig,
};
pub use error::CoreError;
pub use types::{RoleData, RoleIssue, Transaction, TX_ASSOCIATION, TX_REVOKE_ASSOCIATION};
