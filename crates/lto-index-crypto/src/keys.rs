//! Public-key conversion.

use ed25519_dalek::VerifyingKey;

use crate::error::CryptoError;

/// Convert a base58 Ed25519 public key to its X25519 (Montgomery) form.
///
/// Key-agreement verification methods publish the birationally-equivalent
/// X25519 key rather than the signing key itself.
pub fn convert_ed25519_to_x25519(public_key: &str) -> Result<String, CryptoError> {
    let bytes = bs58::decode(public_key)
        .into_vec()
        .map_err(|_| CryptoError::InvalidPublicKey(public_key.to_string()))?;
    let bytes: [u8; 32] = bytes
        .try_into()
        .map_err(|_| CryptoError::InvalidPublicKey(public_key.to_string()))?;

    let verifying_key = VerifyingKey::from_bytes(&bytes)
        .map_err(|_| CryptoError::InvalidPublicKey(public_key.to_string()))?;
    let montgomery = verifying_key.to_montgomery();
    let x25519 = x25519_dalek::PublicKey::from(montgomery.to_bytes());

    Ok(bs58::encode(x25519.as_bytes()).into_string())
}
