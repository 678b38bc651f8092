//! Fans each confirmed transaction out to the history index and the three
//! domain indexers.
//!
//! The feeding pipeline guarantees chain order, one transaction at a time
//! per address; nothing here re-orders or parallelizes.

use std::sync::Arc;

use lto_index_core::{
    AssociationIndexMode, Transaction, TX_ASSOCIATION, TX_REVOKE_ASSOCIATION,
};
use lto_index_identity::IdentityResolver;
use lto_index_storage::Storage;
use lto_index_trust::{AssociationIndexer, TrustNetwork};

use crate::error::NodeError;

/// Catch-all history group every transaction lands in.
const TX_GROUP_ALL: &str = "all";

pub struct TxDispatcher {
    storage: Arc<Storage>,
    associations: Arc<AssociationIndexer>,
    trust: Arc<TrustNetwork>,
    identity: Arc<IdentityResolver>,
    association_mode: AssociationIndexMode,
}

impl TxDispatcher {
    pub fn new(
        storage: Arc<Storage>,
        associations: Arc<AssociationIndexer>,
        trust: Arc<TrustNetwork>,
        identity: Arc<IdentityResolver>,
        association_mode: AssociationIndexMode,
    ) -> Self {
        Self {
            storage,
            associations,
            trust,
            identity,
            association_mode,
        }
    }

    /// Index one confirmed transaction.
    pub async fn index(&self, tx: &Transaction) -> Result<(), NodeError> {
        self.index_history(tx).await?;

        self.associations.index(tx, self.association_mode).await?;
        self.trust.index(tx).await?;
        self.identity.index(tx).await?;

        Ok(())
    }

    /// Record the transaction id in the per-address history sets.
    async fn index_history(&self, tx: &Transaction) -> Result<(), NodeError> {
        let mut addresses: Vec<&str> = vec![&tx.sender];
        for address in [tx.recipient.as_deref(), tx.party.as_deref()].into_iter().flatten() {
            if !addresses.contains(&address) {
                addresses.push(address);
            }
        }

        for address in addresses {
            if let Some(group) = tx_group(tx.tx_type) {
                self.storage
                    .index_tx(group, address, &tx.id, tx.timestamp)
                    .await?;
            }
            self.storage
                .index_tx(TX_GROUP_ALL, address, &tx.id, tx.timestamp)
                .await?;
        }

        Ok(())
    }
}

fn tx_group(tx_type: u16) -> Option<&'static str> {
    match tx_type {
        TX_ASSOCIATION => Some("association"),
        TX_REVOKE_ASSOCIATION => Some("revoke_association"),
        _ => None,
    }
}
