use lto_index_storage::StorageError;

use crate::node_client::NodeClientError;

/// Trust-network errors.
#[derive(Debug, thiserror::Error)]
pub enum TrustError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("node client error: {0}")]
    Node(#[from] NodeClientError),
}
