use lto_index_identity::IdentityError;
use lto_index_storage::StorageError;
use lto_index_trust::TrustError;

/// Errors surfaced by the dispatch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Trust(#[from] TrustError),

    #[error(transparent)]
    Identity(#[from] IdentityError),
}
