//! `did:lto` identifier grammar.

use crate::error::IdentityError;

/// A parsed `did:lto` identifier.
///
/// Grammar: `(did:lto:)?<address>(:derived:<secret>)?` where address and
/// secret are word characters. The method prefix is optional so bare
/// addresses resolve too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Did {
    /// The on-chain address.
    pub address: String,
    /// Derivation secret, when the identifier names a sub-identity.
    pub secret: Option<String>,
}

impl Did {
    /// Parse an identifier against the grammar; anything else is a hard
    /// parse failure.
    pub fn parse(did: &str) -> Result<Self, IdentityError> {
        let stripped = did.strip_prefix("did:lto:").unwrap_or(did);

        let (address, secret) = match stripped.split_once(":derived:") {
            Some((address, secret)) => (address, Some(secret)),
            None => (stripped, None),
        };

        if !is_word(address) {
            return Err(IdentityError::InvalidDid(did.to_string()));
        }
        if let Some(secret) = secret {
            if !is_word(secret) {
                return Err(IdentityError::InvalidDid(did.to_string()));
            }
        }

        Ok(Self {
            address: address.to_string(),
            secret: secret.map(str::to_string),
        })
    }
}

fn is_word(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}
