/// Crypto helper errors.
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),
}
