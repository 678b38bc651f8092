//! LTO Indexer Trust Network — role resolution, grant/revoke processing,
//! sponsorship side effects, and association indexing.
//!
//! Role resolution is config-driven and single-level: an address's stored
//! role records are intersected with the static role table; there is no
//! transitive inheritance.

pub mod associations;
pub mod engine;
pub mod error;
pub mod node_client;

pub use associations::AssociationIndexer;
pub use engine::TrustNetwork;
pub use error::TrustError;
pub use node_client::{NodeClient, NodeClientError};
