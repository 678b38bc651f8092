//! Indexer configuration loading and management.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::types::RoleIssue;

/// Full configuration for the LTO indexer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct IndexerConfig {
    /// Public node RPC settings.
    #[serde(default)]
    pub node: NodeApiConfig,

    /// Read API server settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Association indexing settings.
    #[serde(default)]
    pub association: AssociationConfig,

    /// Trust network role table.
    #[serde(default)]
    pub trust: RoleConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeApiConfig {
    /// Base URL of the public node's REST API.
    #[serde(default = "default_node_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API listen address.
    #[serde(default = "default_api_addr")]
    pub listen_addr: String,
    /// API port.
    #[serde(default = "default_api_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Path to the data directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssociationConfig {
    /// Gating mode for association indexing.
    #[serde(default)]
    pub index_mode: AssociationIndexMode,
}

/// Gating mode for association indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssociationIndexMode {
    /// Index every association transaction.
    #[default]
    All,
    /// Index a grant only when the sender holds at least one role.
    Trust,
}

/// The static trust-network role table, loaded once and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleConfig {
    /// Role name to role definition.
    #[serde(default)]
    pub roles: HashMap<String, RoleEntry>,
}

/// A single role definition in the trust-network role table.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoleEntry {
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Roles this role may issue, keyed by triggering association type.
    #[serde(default)]
    pub issues: Vec<RoleIssue>,
    /// Opaque authorization strings granted by this role.
    #[serde(default)]
    pub authorization: Vec<String>,
    /// Whether parties holding this role are sponsored by the node.
    #[serde(default)]
    pub sponsored: bool,
}

impl RoleConfig {
    /// Look up a role definition by name.
    pub fn get(&self, role: &str) -> Option<&RoleEntry> {
        self.roles.get(role)
    }

    /// Whether the named role is marked as sponsored.
    pub fn is_sponsored(&self, role: &str) -> bool {
        self.roles.get(role).is_some_and(|entry| entry.sponsored)
    }
}

impl Default for RoleConfig {
    fn default() -> Self {
        let mut roles = HashMap::new();
        roles.insert(
            "root".to_string(),
            RoleEntry {
                description: "The root role".to_string(),
                ..Default::default()
            },
        );
        Self { roles }
    }
}

impl Default for AssociationConfig {
    fn default() -> Self {
        Self {
            index_mode: AssociationIndexMode::All,
        }
    }
}

// Default value functions
fn default_node_url() -> String {
    "http://localhost:6869".into()
}
fn default_api_addr() -> String {
    "127.0.0.1".into()
}
fn default_api_port() -> u16 {
    8080
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}
fn default_log_level() -> String {
    "info".into()
}

impl Default for NodeApiConfig {
    fn default() -> Self {
        Self {
            url: default_node_url(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_api_addr(),
            port: default_api_port(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl IndexerConfig {
    /// Load config from a TOML file, falling back to defaults for missing fields.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            let config: IndexerConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save the current config to a TOML file.
    pub fn save(&self, path: &Path) -> Result<(), CoreError> {
        let contents = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, contents)?;
        Ok(())
    }
}
