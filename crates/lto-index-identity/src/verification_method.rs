//! Verification-method records and their persistence.
//!
//! An association transaction whose type carries verification-relationship
//! flags turns the recipient into a verification method of the sender's DID.
//! The association type doubles as the relationship bitmask.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use lto_index_crypto::chain_id_of;
use lto_index_storage::Storage;

use crate::document::{DidVerificationMethod, ED25519_VERIFICATION_KEY_2018};
use crate::error::IdentityError;

/// Relationship flag: authentication.
pub const AUTHENTICATION: u32 = 0x0101;
/// Relationship flag: assertion method.
pub const ASSERTION_METHOD: u32 = 0x0102;
/// Relationship flag: key agreement.
pub const KEY_AGREEMENT: u32 = 0x0104;
/// Relationship flag: capability invocation.
pub const CAPABILITY_INVOCATION: u32 = 0x0108;
/// Relationship flag: capability delegation.
pub const CAPABILITY_DELEGATION: u32 = 0x0110;

/// A stored verification-method record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationMethod {
    pub sender: String,
    pub recipient: String,
    /// Relationship bitmask; flags are non-exclusive.
    pub relationships: u32,
    pub created_at: DateTime<Utc>,
}

impl VerificationMethod {
    pub fn new(relationships: u32, sender: &str, recipient: &str, created_at: DateTime<Utc>) -> Self {
        Self {
            sender: sender.to_string(),
            recipient: recipient.to_string(),
            relationships,
            created_at,
        }
    }

    fn has(&self, relationship: u32) -> bool {
        self.relationships & relationship == relationship
    }

    pub fn is_authentication(&self) -> bool {
        self.has(AUTHENTICATION)
    }

    pub fn is_assertion_method(&self) -> bool {
        self.has(ASSERTION_METHOD)
    }

    pub fn is_key_agreement(&self) -> bool {
        self.has(KEY_AGREEMENT)
    }

    pub fn is_capability_invocation(&self) -> bool {
        self.has(CAPABILITY_INVOCATION)
    }

    pub fn is_capability_delegation(&self) -> bool {
        self.has(CAPABILITY_DELEGATION)
    }

    /// Render this record as a DID-document verification method, keyed by
    /// the recipient's public key.
    pub fn as_did_method(&self, public_key: &str) -> Result<DidVerificationMethod, IdentityError> {
        let chain_id = chain_id_of(&self.recipient)?;
        Ok(DidVerificationMethod {
            id: format!("did:lto:{}#sign", self.recipient),
            method_type: ED25519_VERIFICATION_KEY_2018.to_string(),
            controller: format!("did:lto:{}", self.recipient),
            public_key_base58: public_key.to_string(),
            blockchain_account_id: format!("{}@lto:{}", self.recipient, chain_id as char),
        })
    }
}

/// Persists verification-method records and reports them back in insertion
/// order, which fixes the field order of assembled documents.
pub struct VerificationMethodService {
    storage: Arc<Storage>,
}

impl VerificationMethodService {
    pub fn new(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    /// Record `recipient` as a verification method of `sender`.
    ///
    /// A repeated (sender, recipient) pair is overwritten in place so its
    /// position in the method list is stable.
    pub async fn save(
        &self,
        association_type: u32,
        sender: &str,
        recipient: &str,
    ) -> Result<(), IdentityError> {
        let mut methods = self.load(sender).await?;
        let method = VerificationMethod::new(association_type, sender, recipient, Utc::now());

        match methods.iter_mut().find(|known| known.recipient == recipient) {
            Some(existing) => *existing = method,
            None => methods.push(method),
        }

        tracing::debug!(sender, recipient, association_type, "saving verification method");
        self.storage
            .save_verification_methods(sender, &serde_json::to_value(&methods)?)
            .await?;
        Ok(())
    }

    /// The verification methods of an address, in insertion order.
    pub async fn get_methods_for(
        &self,
        address: &str,
    ) -> Result<Vec<VerificationMethod>, IdentityError> {
        self.load(address).await
    }

    async fn load(&self, address: &str) -> Result<Vec<VerificationMethod>, IdentityError> {
        match self.storage.get_verification_methods(address).await? {
            Some(raw) => Ok(serde_json::from_value(raw)?),
            None => Ok(Vec::new()),
        }
    }
}
