//! LTO Indexer Crypto — address and public-key helpers.
//!
//! Covers the three call contracts the resolver needs: chain-id extraction
//! from an address, derived sub-address computation, and Ed25519→X25519
//! public-key conversion for key-agreement methods.

pub mod address;
pub mod error;
pub mod keys;

pub use address::{chain_id_of, derive_address};
pub use error::CryptoError;
pub use keys::convert_ed25519_to_x25519;
