//! Trust-network engine: role resolution and grant/revoke processing.

use std::sync::Arc;

use lto_index_core::{RoleConfig, RoleData, RoleIssue, Transaction, TX_ASSOCIATION};
use lto_index_storage::Storage;

use crate::error::TrustError;
use crate::node_client::NodeClient;

/// Resolves effective roles and processes role grant/revoke transactions,
/// including the node-sponsorship side effects.
pub struct TrustNetwork {
    storage: Arc<Storage>,
    node: Arc<dyn NodeClient>,
    roles: RoleConfig,
}

impl TrustNetwork {
    /// The role table is injected once at construction and never changes.
    pub fn new(storage: Arc<Storage>, node: Arc<dyn NodeClient>, roles: RoleConfig) -> Self {
        Self {
            storage,
            node,
            roles,
        }
    }

    /// Process a confirmed transaction.
    ///
    /// Only association grant/revoke transactions with both a party and an
    /// association type are meaningful; everything else is skipped with a
    /// debug line and zero storage calls.
    pub async fn index(&self, tx: &Transaction) -> Result<(), TrustError> {
        if !tx.is_association() {
            tracing::debug!(id = %tx.id, tx_type = tx.tx_type, "trust-network: unknown transaction type");
            return Ok(());
        }

        let Some(party) = tx.party.as_deref() else {
            tracing::debug!(id = %tx.id, "trust-network: transaction has no party address, skipped");
            return Ok(());
        };
        let Some(association_type) = tx.association_type else {
            tracing::debug!(id = %tx.id, "trust-network: transaction has no association type, skipped");
            return Ok(());
        };

        if tx.tx_type == TX_ASSOCIATION {
            tracing::debug!(id = %tx.id, party, "trust-network: saving role association");
            self.save_role_association(tx, party, association_type).await
        } else {
            tracing::debug!(id = %tx.id, party, "trust-network: removing role association");
            self.remove_role_association(tx, party, association_type).await
        }
    }

    /// Effective roles of an address, recomputed from storage and the role
    /// table on every call.
    ///
    /// The node operator's own wallet always carries an implicit `root`.
    /// Stored role names absent from the role table contribute nothing.
    pub async fn get_roles_for(&self, address: &str) -> Result<RoleData, TrustError> {
        let mut names: Vec<String> = Vec::new();

        if self.node.get_node_wallet().await? == address {
            names.push("root".to_string());
        }

        for name in self.storage.get_roles_for(address).await?.keys() {
            if !names.iter().any(|existing| existing == name) {
                names.push(name.clone());
            }
        }

        let mut result = RoleData::default();
        for name in names {
            let Some(entry) = self.roles.get(&name) else {
                continue;
            };
            result.roles.push(name);

            for issue in &entry.issues {
                if !result.issues_roles.iter().any(|known| known.role == issue.role) {
                    result.issues_roles.push(issue.clone());
                }
            }
            for authorization in &entry.authorization {
                if !result.issues_authorization.iter().any(|known| known == authorization) {
                    result.issues_authorization.push(authorization.clone());
                }
            }
        }

        Ok(result)
    }

    /// Whether at least one of the given role names is marked sponsored in
    /// the role table.
    pub fn has_sponsored_roles<'a>(&self, roles: impl IntoIterator<Item = &'a str>) -> bool {
        roles.into_iter().any(|role| self.roles.is_sponsored(role))
    }

    /// Whether this node's wallet is among the sponsors of an address.
    pub async fn is_sponsored_by_node(&self, address: &str) -> Result<bool, TrustError> {
        let wallet = self.node.get_node_wallet().await?;
        Ok(self.node.get_sponsors_of(address).await?.contains(&wallet))
    }

    async fn save_role_association(
        &self,
        tx: &Transaction,
        party: &str,
        association_type: u32,
    ) -> Result<(), TrustError> {
        let sender_roles = self.get_roles_for(&tx.sender).await?;

        let mut granted: Vec<RoleIssue> = Vec::new();
        for issue in &sender_roles.issues_roles {
            if issue.association_type == association_type
                && !granted.iter().any(|staged| staged.role == issue.role)
            {
                self.storage
                    .save_role_association(party, &tx.sender, issue)
                    .await?;
                granted.push(issue.clone());
            }
        }

        if granted.is_empty() {
            return Ok(());
        }

        // The grant is already persisted; a sponsorship failure must not
        // undo it, so this sub-step is contained.
        if self.has_sponsored_roles(granted.iter().map(|issue| issue.role.as_str())) {
            if let Err(error) = self.sponsor_party(party).await {
                tracing::error!(party, %error, "trust-network: error sponsoring party after role grant");
            }
        }

        Ok(())
    }

    async fn sponsor_party(&self, party: &str) -> Result<(), TrustError> {
        if self.is_sponsored_by_node(party).await? {
            return Ok(());
        }

        tracing::debug!(party, "trust-network: party is being given a sponsored role, sending a transaction to the node");
        self.node.sponsor(party).await?;
        Ok(())
    }

    async fn remove_role_association(
        &self,
        tx: &Transaction,
        party: &str,
        association_type: u32,
    ) -> Result<(), TrustError> {
        let sender_roles = self.get_roles_for(&tx.sender).await?;

        let mut removed: Vec<RoleIssue> = Vec::new();
        for issue in &sender_roles.issues_roles {
            if issue.association_type == association_type
                && !removed.iter().any(|staged| staged.role == issue.role)
            {
                self.storage.remove_role_association(party, &issue.role).await?;
                removed.push(issue.clone());
            }
        }

        if removed.is_empty() {
            return Ok(());
        }

        let party_roles = self.get_roles_for(party).await?;
        if !self.has_sponsored_roles(party_roles.roles.iter().map(String::as_str)) {
            tracing::debug!(party, "trust-network: party has no more sponsored roles, sending a transaction to the node");
            self.node.cancel_sponsor(party).await?;
        }

        Ok(())
    }
}
