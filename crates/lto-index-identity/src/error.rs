use lto_index_crypto::CryptoError;
use lto_index_storage::StorageError;

/// Identity-layer errors.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("invalid DID: {0}")]
    InvalidDid(String),

    #[error("no public key indexed for address {0}")]
    UnknownPublicKey(String),

    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("stored verification methods are malformed: {0}")]
    Serialization(#[from] serde_json::Error),
}
