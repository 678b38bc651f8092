//! Generic association indexing, optionally gated on trust membership.

use std::sync::Arc;

use lto_index_core::{AssociationIndexMode, Transaction, TX_ASSOCIATION, TX_REVOKE_ASSOCIATION};
use lto_index_storage::{Associations, Storage};

use crate::engine::TrustNetwork;
use crate::error::TrustError;

/// Records and removes association edges from confirmed transactions.
pub struct AssociationIndexer {
    storage: Arc<Storage>,
    trust: Arc<TrustNetwork>,
}

impl AssociationIndexer {
    pub fn new(storage: Arc<Storage>, trust: Arc<TrustNetwork>) -> Self {
        Self { storage, trust }
    }

    /// Process a confirmed transaction.
    ///
    /// Grants persist the (sender, recipient) edge; revokes remove it.
    /// Under [`AssociationIndexMode::Trust`], a grant from a sender without
    /// any role is dropped; revokes are never gated.
    pub async fn index(&self, tx: &Transaction, mode: AssociationIndexMode) -> Result<(), TrustError> {
        match tx.tx_type {
            TX_ASSOCIATION => self.save(tx, mode).await,
            TX_REVOKE_ASSOCIATION => self.remove(tx).await,
            _ => {
                tracing::debug!(id = %tx.id, tx_type = tx.tx_type, "association-indexer: unknown transaction type");
                Ok(())
            }
        }
    }

    /// Associations around an address, straight from storage.
    pub async fn get_associations(&self, address: &str) -> Result<Associations, TrustError> {
        Ok(self.storage.get_associations(address).await?)
    }

    async fn save(&self, tx: &Transaction, mode: AssociationIndexMode) -> Result<(), TrustError> {
        let Some(recipient) = tx.recipient.as_deref() else {
            tracing::debug!(id = %tx.id, "association-indexer: transaction has no recipient, skipped");
            return Ok(());
        };

        if mode == AssociationIndexMode::Trust {
            let roles = self.trust.get_roles_for(&tx.sender).await?;
            if roles.roles.is_empty() {
                tracing::debug!(sender = %tx.sender, "association-indexer: sender is not part of trust network");
                return Ok(());
            }
        }

        tracing::debug!(sender = %tx.sender, recipient, "association-indexer: saving association");
        Ok(self.storage.save_association(&tx.sender, recipient).await?)
    }

    async fn remove(&self, tx: &Transaction) -> Result<(), TrustError> {
        let Some(recipient) = tx.recipient.as_deref() else {
            tracing::debug!(id = %tx.id, "association-indexer: transaction has no recipient, skipped");
            return Ok(());
        };

        tracing::debug!(sender = %tx.sender, recipient, "association-indexer: removing association");
        Ok(self.storage.remove_association(&tx.sender, recipient).await?)
    }
}
