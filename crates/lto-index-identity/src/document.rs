//! W3C DID document types, derived on every resolution and never persisted.

use serde::{Deserialize, Serialize};

/// The DID document JSON-LD context.
pub const DID_CONTEXT: &str = "https://www.w3.org/ns/did/v1";

/// Method type of Ed25519 signing keys.
pub const ED25519_VERIFICATION_KEY_2018: &str = "Ed25519VerificationKey2018";

/// Method type of X25519 key-agreement keys.
pub const X25519_KEY_AGREEMENT_KEY_2019: &str = "X25519KeyAgreementKey2019";

/// A verification method entry inside a DID document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DidVerificationMethod {
    pub id: String,
    #[serde(rename = "type")]
    pub method_type: String,
    pub controller: String,
    #[serde(rename = "publicKeyBase58")]
    pub public_key_base58: String,
    #[serde(rename = "blockchainAccountId")]
    pub blockchain_account_id: String,
}

/// A resolved DID document.
///
/// Capability fields are absent (not empty) when nothing references them,
/// matching the wire format resolvers expect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DidDocument {
    #[serde(rename = "@context")]
    pub context: String,
    pub id: String,
    #[serde(rename = "verificationMethod")]
    pub verification_method: Vec<DidVerificationMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Vec<String>>,
    #[serde(rename = "assertionMethod", skip_serializing_if = "Option::is_none")]
    pub assertion_method: Option<Vec<String>>,
    #[serde(rename = "keyAgreement", skip_serializing_if = "Option::is_none")]
    pub key_agreement: Option<Vec<DidVerificationMethod>>,
    #[serde(rename = "capabilityInvocation", skip_serializing_if = "Option::is_none")]
    pub capability_invocation: Option<Vec<String>>,
    #[serde(rename = "capabilityDelegation", skip_serializing_if = "Option::is_none")]
    pub capability_delegation: Option<Vec<String>>,
}
