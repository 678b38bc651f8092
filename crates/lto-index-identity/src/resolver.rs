//! DID resolution and document assembly.

use std::sync::Arc;

use lto_index_core::Transaction;
use lto_index_crypto::{chain_id_of, convert_ed25519_to_x25519, derive_address};
use lto_index_storage::Storage;

use crate::did::Did;
use crate::document::{
    DidDocument, DidVerificationMethod, DID_CONTEXT, ED25519_VERIFICATION_KEY_2018,
    X25519_KEY_AGREEMENT_KEY_2019,
};
use crate::error::IdentityError;
use crate::verification_method::VerificationMethodService;

/// Resolves `did:lto` identifiers to documents and derives sub-identities.
pub struct IdentityResolver {
    storage: Arc<Storage>,
    verification_methods: Arc<VerificationMethodService>,
}

impl IdentityResolver {
    pub fn new(storage: Arc<Storage>, verification_methods: Arc<VerificationMethodService>) -> Self {
        Self {
            storage,
            verification_methods,
        }
    }

    /// Process a confirmed transaction: record the sender's public key, and
    /// hand association transactions to the verification-method service.
    pub async fn index(&self, tx: &Transaction) -> Result<(), IdentityError> {
        match tx.sender_public_key.as_deref() {
            Some(public_key) => {
                tracing::debug!(sender = %tx.sender, "identity: saving sender public key");
                self.storage.save_public_key(&tx.sender, public_key).await?;
            }
            None => {
                tracing::debug!(id = %tx.id, "identity: transaction carries no sender public key");
            }
        }

        let (Some(recipient), Some(association_type)) =
            (tx.recipient.as_deref(), tx.association_type)
        else {
            tracing::debug!(
                id = %tx.id,
                "identity: no recipient address or association type, skipped verification method indexing"
            );
            return Ok(());
        };

        self.verification_methods
            .save(association_type, &tx.sender, recipient)
            .await
    }

    /// Resolve a DID to its document.
    ///
    /// A missing subject key is not an error; the document is assembled with
    /// an empty key. `None` means a counterpart key was missing (§ document
    /// assembly), never a transport failure.
    pub async fn resolve(&self, did: &str) -> Result<Option<DidDocument>, IdentityError> {
        // The grammar admits a derived secret here; it deliberately gets no
        // behavior, and the full suffix survives inside the document id.
        let parsed = Did::parse(did)?;

        let public_key = self
            .storage
            .get_public_key(&parsed.address)
            .await?
            .unwrap_or_default();
        let id = did.strip_prefix("did:lto:").unwrap_or(did);

        self.assemble_document(id, &parsed.address, &public_key).await
    }

    /// Resolve a DID to the address it names, deriving the sub-address when
    /// a secret is present.
    pub async fn get_address(&self, did: &str) -> Result<String, IdentityError> {
        let parsed = Did::parse(did)?;

        let Some(secret) = parsed.secret else {
            return Ok(parsed.address);
        };

        let public_key = self
            .storage
            .get_public_key(&parsed.address)
            .await?
            .ok_or_else(|| IdentityError::UnknownPublicKey(parsed.address.clone()))?;
        let chain_id = chain_id_of(&parsed.address)?;

        Ok(derive_address(&public_key, &secret, chain_id)?)
    }

    /// Document of the sub-identity `address:derived:secret`.
    /// An unknown address yields `None` rather than an error.
    pub async fn get_derived_identity(
        &self,
        address: &str,
        secret: &str,
    ) -> Result<Option<DidDocument>, IdentityError> {
        let Some(public_key) = self.storage.get_public_key(address).await? else {
            return Ok(None);
        };

        self.assemble_document(&format!("{address}:derived:{secret}"), address, &public_key)
            .await
    }

    /// Assemble a document for `id`, anchored at `address`.
    ///
    /// Verification methods are appended in stored order; their counterpart
    /// keys are looked up sequentially because the order fixes the document
    /// layout. One missing counterpart key invalidates the whole document.
    pub async fn assemble_document(
        &self,
        id: &str,
        address: &str,
        public_key: &str,
    ) -> Result<Option<DidDocument>, IdentityError> {
        let methods = self.verification_methods.get_methods_for(address).await?;
        let chain_id = chain_id_of(address)?;

        let mut document = DidDocument {
            context: DID_CONTEXT.to_string(),
            id: format!("did:lto:{id}"),
            verification_method: vec![DidVerificationMethod {
                id: format!("did:lto:{address}#sign"),
                method_type: ED25519_VERIFICATION_KEY_2018.to_string(),
                controller: format!("did:lto:{address}"),
                public_key_base58: public_key.to_string(),
                blockchain_account_id: format!("{address}@lto:{}", chain_id as char),
            }],
            authentication: None,
            assertion_method: None,
            key_agreement: None,
            capability_invocation: None,
            capability_delegation: None,
        };

        for method in &methods {
            let Some(recipient_key) = self.storage.get_public_key(&method.recipient).await? else {
                tracing::debug!(
                    address,
                    recipient = %method.recipient,
                    "identity: verification method counterpart has no indexed key, document unresolvable"
                );
                return Ok(None);
            };

            let did_method = method.as_did_method(&recipient_key)?;

            if method.is_authentication() {
                document
                    .authentication
                    .get_or_insert_with(Vec::new)
                    .push(did_method.id.clone());
            }
            if method.is_assertion_method() {
                document
                    .assertion_method
                    .get_or_insert_with(Vec::new)
                    .push(did_method.id.clone());
            }
            if method.is_key_agreement() {
                document
                    .key_agreement
                    .get_or_insert_with(Vec::new)
                    .push(DidVerificationMethod {
                        id: format!("{}#encrypt", did_method.controller),
                        method_type: X25519_KEY_AGREEMENT_KEY_2019.to_string(),
                        controller: did_method.controller.clone(),
                        public_key_base58: convert_ed25519_to_x25519(&recipient_key)?,
                        blockchain_account_id: did_method.blockchain_account_id.clone(),
                    });
            }
            if method.is_capability_invocation() {
                document
                    .capability_invocation
                    .get_or_insert_with(Vec::new)
                    .push(did_method.id.clone());
            }
            if method.is_capability_delegation() {
                document
                    .capability_delegation
                    .get_or_insert_with(Vec::new)
                    .push(did_method.id.clone());
            }

            document.verification_method.push(did_method);
        }

        // Default self-capability when no other method made it in.
        if document.verification_method.len() == 1 {
            let sign_id = format!("did:lto:{address}#sign");
            document.authentication = Some(vec![sign_id.clone()]);
            document.assertion_method = Some(vec![sign_id.clone()]);
            document.capability_invocation = Some(vec![sign_id]);
        }

        Ok(Some(document))
    }
}
