//! Semantic storage contract over a [`Driver`].
//!
//! Owns the key layout; everything is stored under the `lto:` namespace.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::sync::Arc;

use lto_index_core::RoleIssue;

use crate::driver::Driver;
use crate::error::StorageError;

/// Association edges around one address, both directions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Associations {
    /// Addresses this address has an outgoing edge to.
    pub children: Vec<String>,
    /// Addresses with an edge pointing at this address.
    pub parents: Vec<String>,
}

/// Semantic storage service used by the indexers and resolvers.
pub struct Storage {
    driver: Arc<dyn Driver>,
}

impl Storage {
    pub fn new(driver: Arc<dyn Driver>) -> Self {
        Self { driver }
    }

    /// Release the underlying driver connection.
    pub async fn close(&self) -> Result<(), StorageError> {
        self.driver.close().await
    }

    // --- Scalars ---

    pub async fn get_value(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.driver.get(key).await
    }

    pub async fn set_value(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.driver.set(key, value).await
    }

    pub async fn del_value(&self, key: &str) -> Result<(), StorageError> {
        self.driver.del(key).await
    }

    pub async fn incr_value(&self, key: &str) -> Result<i64, StorageError> {
        self.driver.incr(key).await
    }

    // --- JSON objects ---

    /// Read a JSON object; a missing key reads as the empty object.
    pub async fn get_object(&self, key: &str) -> Result<Map<String, Value>, StorageError> {
        match self.driver.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Map::new()),
        }
    }

    pub async fn set_object(&self, key: &str, object: &Map<String, Value>) -> Result<(), StorageError> {
        let raw = serde_json::to_string(object)?;
        self.driver.set(key, &raw).await
    }

    /// Write the object only when the key does not exist yet.
    pub async fn add_object_if_absent(
        &self,
        key: &str,
        object: &Map<String, Value>,
    ) -> Result<(), StorageError> {
        if self.driver.get(key).await?.is_none() {
            self.set_object(key, object).await?;
        }
        Ok(())
    }

    // --- Public keys ---

    pub async fn save_public_key(&self, address: &str, public_key: &str) -> Result<(), StorageError> {
        self.driver
            .set(&format!("lto:pubkey:{address}"), public_key)
            .await
    }

    pub async fn get_public_key(&self, address: &str) -> Result<Option<String>, StorageError> {
        self.driver.get(&format!("lto:pubkey:{address}")).await
    }

    // --- Association edges ---

    /// Record the directed edge (sender → recipient) on both endpoints.
    pub async fn save_association(&self, sender: &str, recipient: &str) -> Result<(), StorageError> {
        self.list_add(&Self::childs_key(sender), recipient).await?;
        self.list_add(&Self::parents_key(recipient), sender).await
    }

    /// Remove the directed edge (sender → recipient) from both endpoints.
    pub async fn remove_association(
        &self,
        sender: &str,
        recipient: &str,
    ) -> Result<(), StorageError> {
        self.list_remove(&Self::childs_key(sender), recipient).await?;
        self.list_remove(&Self::parents_key(recipient), sender).await
    }

    pub async fn get_associations(&self, address: &str) -> Result<Associations, StorageError> {
        Ok(Associations {
            children: self.get_list(&Self::childs_key(address)).await?,
            parents: self.get_list(&Self::parents_key(address)).await?,
        })
    }

    // --- Role records ---

    /// Record that `issuer` granted `role` to `party`. The record value is
    /// opaque metadata; only the key's presence matters to role resolution.
    pub async fn save_role_association(
        &self,
        party: &str,
        issuer: &str,
        role: &RoleIssue,
    ) -> Result<(), StorageError> {
        let key = Self::roles_key(party);
        let mut roles = self.get_object(&key).await?;
        roles.insert(
            role.role.clone(),
            json!({ "issuer": issuer, "type": role.association_type }),
        );
        self.set_object(&key, &roles).await
    }

    /// Drop the named role record from `party`, whoever issued it.
    pub async fn remove_role_association(
        &self,
        party: &str,
        role: &str,
    ) -> Result<(), StorageError> {
        let key = Self::roles_key(party);
        let mut roles = self.get_object(&key).await?;
        roles.remove(role);
        self.set_object(&key, &roles).await
    }

    /// Raw role records of an address: role name → opaque metadata.
    pub async fn get_roles_for(&self, address: &str) -> Result<Map<String, Value>, StorageError> {
        self.get_object(&Self::roles_key(address)).await
    }

    // --- Verification methods (raw persistence for the identity layer) ---

    pub async fn save_verification_methods(
        &self,
        address: &str,
        methods: &Value,
    ) -> Result<(), StorageError> {
        let raw = serde_json::to_string(methods)?;
        self.driver
            .set(&format!("lto:verification:{address}"), &raw)
            .await
    }

    pub async fn get_verification_methods(
        &self,
        address: &str,
    ) -> Result<Option<Value>, StorageError> {
        match self.driver.get(&format!("lto:verification:{address}")).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    // --- Transaction history index ---

    pub async fn index_tx(
        &self,
        tx_type: &str,
        address: &str,
        tx_id: &str,
        timestamp: u64,
    ) -> Result<(), StorageError> {
        self.driver
            .zadd(&Self::tx_key(tx_type, address), timestamp, tx_id)
            .await
    }

    pub async fn get_tx(
        &self,
        tx_type: &str,
        address: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<String>, StorageError> {
        self.driver
            .zrange(&Self::tx_key(tx_type, address), limit, offset)
            .await
    }

    pub async fn count_tx(&self, tx_type: &str, address: &str) -> Result<usize, StorageError> {
        self.driver.zcard(&Self::tx_key(tx_type, address)).await
    }

    // --- Key layout ---

    fn childs_key(address: &str) -> String {
        format!("lto:assoc:{address}:childs")
    }

    fn parents_key(address: &str) -> String {
        format!("lto:assoc:{address}:parents")
    }

    fn roles_key(address: &str) -> String {
        format!("lto:roles:{address}")
    }

    fn tx_key(tx_type: &str, address: &str) -> String {
        format!("lto:tx:{tx_type}:{address}")
    }

    // --- List helpers ---

    async fn get_list(&self, key: &str) -> Result<Vec<String>, StorageError> {
        match self.driver.get(key).await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(Vec::new()),
        }
    }

    async fn list_add(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut list = self.get_list(key).await?;
        if !list.iter().any(|entry| entry == value) {
            list.push(value.to_string());
            self.driver.set(key, &serde_json::to_string(&list)?).await?;
        }
        Ok(())
    }

    async fn list_remove(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut list = self.get_list(key).await?;
        list.retain(|entry| entry != value);
        if list.is_empty() {
            self.driver.del(key).await
        } else {
            self.driver.set(key, &serde_json::to_string(&list)?).await
        }
    }
}
