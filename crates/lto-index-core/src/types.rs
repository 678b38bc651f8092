use serde::{Deserialize, Serialize};

/// Chain transaction type for granting an association.
pub const TX_ASSOCIATION: u16 = 16;
/// Chain transaction type for revoking an association.
pub const TX_REVOKE_ASSOCIATION: u16 = 17;

/// A confirmed chain transaction as delivered by the indexing pipeline.
///
/// Only the fields the indexer consumes are modeled; `block_height` and
/// `position` are carried through for downstream consumers but unused here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction id on the chain.
    pub id: String,
    /// Numeric transaction type.
    #[serde(rename = "type")]
    pub tx_type: u16,
    /// Sender address.
    pub sender: String,
    /// Sender public key (base58), when the node reports it.
    #[serde(default)]
    pub sender_public_key: Option<String>,
    /// Recipient address for association transactions.
    #[serde(default)]
    pub recipient: Option<String>,
    /// The address being granted or revoked a role.
    #[serde(default)]
    pub party: Option<String>,
    /// Association type discriminator.
    #[serde(default)]
    pub association_type: Option<u32>,
    /// Transaction timestamp in epoch milliseconds.
    pub timestamp: u64,
    /// Height of the containing block.
    pub block_height: u64,
    /// Position of the transaction within the block.
    pub position: u32,
}

impl Transaction {
    /// Whether this transaction grants or revokes an association.
    pub fn is_association(&self) -> bool {
        self.tx_type == TX_ASSOCIATION || self.tx_type == TX_REVOKE_ASSOCIATION
    }
}

/// A role a sender may issue, keyed by the association type that triggers it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleIssue {
    /// Name of the role being issued.
    pub role: String,
    /// Association type that triggers issuance of this role.
    #[serde(rename = "type")]
    pub association_type: u32,
}

/// Effective roles of an address, recomputed on every query.
///
/// `issues_roles` and `issues_authorization` are deduplicated unions over
/// the role table entries of `roles`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleData {
    /// Role names held by the address.
    pub roles: Vec<String>,
    /// Roles the address may issue, deduplicated by role name.
    pub issues_roles: Vec<RoleIssue>,
    /// Authorization strings granted by the held roles, deduplicated.
    pub issues_authorization: Vec<String>,
}
