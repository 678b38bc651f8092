//! Shared fixtures for the integration tests: a recording mock node client,
//! address construction, a realistic role table, and a fully wired stack
//! over in-memory storage.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use lto_index_core::{AssociationIndexMode, RoleConfig, RoleEntry, RoleIssue, Transaction};
use lto_index_identity::{IdentityResolver, VerificationMethodService};
use lto_index_node::TxDispatcher;
use lto_index_storage::{MemoryDriver, Storage};
use lto_index_trust::{AssociationIndexer, NodeClient, NodeClientError, TrustNetwork};

/// Association type that triggers authority issuance in [`role_table`].
pub const ISSUES_AUTHORITY: u32 = 256;
/// Association type that triggers graduate issuance in [`role_table`].
pub const ISSUES_GRADUATE: u32 = 257;

/// Mock node client that records sponsorship calls.
pub struct MockNodeClient {
    pub wallet: String,
    sponsors: Mutex<HashMap<String, Vec<String>>>,
    sponsor_calls: Mutex<Vec<String>>,
    cancel_calls: Mutex<Vec<String>>,
}

impl MockNodeClient {
    pub fn new(wallet: &str) -> Self {
        Self {
            wallet: wallet.to_string(),
            sponsors: Mutex::new(HashMap::new()),
            sponsor_calls: Mutex::new(Vec::new()),
            cancel_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set_sponsors(&self, address: &str, sponsors: Vec<String>) {
        self.sponsors
            .lock()
            .unwrap()
            .insert(address.to_string(), sponsors);
    }

    pub fn sponsor_calls(&self) -> Vec<String> {
        self.sponsor_calls.lock().unwrap().clone()
    }

    pub fn cancel_calls(&self) -> Vec<String> {
        self.cancel_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NodeClient for MockNodeClient {
    async fn get_node_wallet(&self) -> Result<String, NodeClientError> {
        Ok(self.wallet.clone())
    }

    async fn sponsor(&self, address: &str) -> Result<(), NodeClientError> {
        self.sponsor_calls.lock().unwrap().push(address.to_string());
        // The node now sponsors the address.
        self.sponsors
            .lock()
            .unwrap()
            .entry(address.to_string())
            .or_default()
            .push(self.wallet.clone());
        Ok(())
    }

    async fn cancel_sponsor(&self, address: &str) -> Result<(), NodeClientError> {
        self.cancel_calls.lock().unwrap().push(address.to_string());
        if let Some(sponsors) = self.sponsors.lock().unwrap().get_mut(address) {
            sponsors.retain(|sponsor| sponsor != &self.wallet);
        }
        Ok(())
    }

    async fn get_sponsors_of(&self, address: &str) -> Result<Vec<String>, NodeClientError> {
        Ok(self
            .sponsors
            .lock()
            .unwrap()
            .get(address)
            .cloned()
            .unwrap_or_default())
    }
}

/// Build a structurally valid base58 address on the given chain.
pub fn make_address(seed: &str, chain_id: u8) -> String {
    let mut raw = vec![0x01, chain_id];
    let hash = blake3::hash(seed.as_bytes());
    raw.extend_from_slice(&hash.as_bytes()[..20]);
    let checksum = blake3::hash(&raw);
    raw.extend_from_slice(&checksum.as_bytes()[..4]);
    bs58::encode(raw).into_string()
}

/// A base58 Ed25519 public key.
pub fn make_public_key() -> String {
    let signing_key = ed25519_dalek::SigningKey::generate(&mut rand::rngs::OsRng);
    bs58::encode(signing_key.verifying_key().as_bytes()).into_string()
}

/// root issues authority (256), authority issues the sponsored graduate
/// role (257).
pub fn role_table() -> RoleConfig {
    let mut roles = HashMap::new();
    roles.insert(
        "root".to_string(),
        RoleEntry {
            description: "The root role".into(),
            issues: vec![RoleIssue {
                role: "authority".into(),
                association_type: ISSUES_AUTHORITY,
            }],
            authorization: vec!["manage_roles".into()],
            ..Default::default()
        },
    );
    roles.insert(
        "authority".to_string(),
        RoleEntry {
            description: "University".into(),
            issues: vec![RoleIssue {
                role: "graduate".into(),
                association_type: ISSUES_GRADUATE,
            }],
            authorization: vec!["issue_diploma".into()],
            ..Default::default()
        },
    );
    roles.insert(
        "graduate".to_string(),
        RoleEntry {
            sponsored: true,
            ..Default::default()
        },
    );
    RoleConfig { roles }
}

/// A fully wired indexing stack over in-memory storage.
pub struct Stack {
    pub storage: Arc<Storage>,
    pub node: Arc<MockNodeClient>,
    pub trust: Arc<TrustNetwork>,
    pub associations: Arc<AssociationIndexer>,
    pub resolver: Arc<IdentityResolver>,
    pub dispatcher: TxDispatcher,
}

pub fn build_stack(node_wallet: &str, mode: AssociationIndexMode) -> Stack {
    let storage = Arc::new(Storage::new(Arc::new(MemoryDriver::new())));
    let node = Arc::new(MockNodeClient::new(node_wallet));
    let trust = Arc::new(TrustNetwork::new(
        storage.clone(),
        node.clone(),
        role_table(),
    ));
    let associations = Arc::new(AssociationIndexer::new(storage.clone(), trust.clone()));
    let resolver = Arc::new(IdentityResolver::new(
        storage.clone(),
        Arc::new(VerificationMethodService::new(storage.clone())),
    ));
    let dispatcher = TxDispatcher::new(
        storage.clone(),
        associations.clone(),
        trust.clone(),
        resolver.clone(),
        mode,
    );

    Stack {
        storage,
        node,
        trust,
        associations,
        resolver,
        dispatcher,
    }
}

/// An association transaction carrying every optional field.
pub fn association_tx(
    id: &str,
    tx_type: u16,
    sender: &str,
    recipient: &str,
    association_type: u32,
    timestamp: u64,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        tx_type,
        sender: sender.to_string(),
        sender_public_key: Some(make_public_key()),
        recipient: Some(recipient.to_string()),
        party: Some(recipient.to_string()),
        association_type: Some(association_type),
        timestamp,
        block_height: 1,
        position: 0,
    }
}
