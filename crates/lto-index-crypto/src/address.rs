//! Chain addresses.
//!
//! An address is base58-encoded: version byte, chain id byte, 20-byte
//! account hash, 4-byte checksum.

use crate::error::CryptoError;

/// Address version byte.
pub const ADDRESS_VERSION: u8 = 0x01;

const ACCOUNT_HASH_LEN: usize = 20;
const CHECKSUM_LEN: usize = 4;
const ADDRESS_LEN: usize = 2 + ACCOUNT_HASH_LEN + CHECKSUM_LEN;

/// Extract the chain id from a base58 address.
pub fn chain_id_of(address: &str) -> Result<u8, CryptoError> {
    let bytes = bs58::decode(address)
        .into_vec()
        .map_err(|_| CryptoError::InvalidAddress(address.to_string()))?;
    if bytes.len() < 2 {
        return Err(CryptoError::InvalidAddress(address.to_string()));
    }
    Ok(bytes[1])
}

/// Derive a sub-address from a public key and a secret on the given chain.
///
/// The account hash binds the parent public key and the secret, so distinct
/// secrets yield distinct, deterministic addresses under the same key.
pub fn derive_address(public_key: &str, secret: &str, chain_id: u8) -> Result<String, CryptoError> {
    let key_bytes = bs58::decode(public_key)
        .into_vec()
        .map_err(|_| CryptoError::InvalidPublicKey(public_key.to_string()))?;

    let mut hasher = blake3::Hasher::new();
    hasher.update(&key_bytes);
    hasher.update(secret.as_bytes());
    let account_hash = hasher.finalize();

    let mut raw = Vec::with_capacity(ADDRESS_LEN);
    raw.push(ADDRESS_VERSION);
    raw.push(chain_id);
    raw.extend_from_slice(&account_hash.as_bytes()[..ACCOUNT_HASH_LEN]);

    let checksum = blake3::hash(&raw);
    raw.extend_from_slice(&checksum.as_bytes()[..CHECKSUM_LEN]);

    Ok(bs58::encode(raw).into_string())
}
