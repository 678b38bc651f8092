//! Seam to the node's wallet and sponsorship RPC.

use async_trait::async_trait;

/// Node client errors. The RPC transport is behind this seam, so transport
/// detail is reduced to a message here.
#[derive(Debug, thiserror::Error)]
pub enum NodeClientError {
    #[error("node request failed: {0}")]
    Request(String),

    #[error("unexpected node response: {0}")]
    UnexpectedResponse(String),
}

/// The node operations the trust network depends on.
#[async_trait]
pub trait NodeClient: Send + Sync {
    /// The node operator's own wallet address.
    async fn get_node_wallet(&self) -> Result<String, NodeClientError>;

    /// Start sponsoring transaction fees for an address.
    async fn sponsor(&self, address: &str) -> Result<(), NodeClientError>;

    /// Stop sponsoring an address.
    async fn cancel_sponsor(&self, address: &str) -> Result<(), NodeClientError>;

    /// Addresses currently sponsoring the given address.
    async fn get_sponsors_of(&self, address: &str) -> Result<Vec<String>, NodeClientError>;
}
