//! HTTP client for the public node's wallet and sponsorship API.

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::OnceCell;

use lto_index_trust::{NodeClient, NodeClientError};

#[derive(Deserialize)]
struct SponsorshipStatus {
    sponsor: Vec<String>,
}

/// REST client against the node the indexer runs next to.
///
/// The wallet address is fetched once and cached for the process lifetime.
pub struct HttpNodeClient {
    base_url: String,
    client: reqwest::Client,
    wallet: OnceCell<String>,
}

impl HttpNodeClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            wallet: OnceCell::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

fn request_error(error: reqwest::Error) -> NodeClientError {
    NodeClientError::Request(error.to_string())
}

#[async_trait]
impl NodeClient for HttpNodeClient {
    async fn get_node_wallet(&self) -> Result<String, NodeClientError> {
        self.wallet
            .get_or_try_init(|| async {
                let addresses: Vec<String> = self
                    .client
                    .get(self.url("/wallet/addresses"))
                    .send()
                    .await
                    .map_err(request_error)?
                    .error_for_status()
                    .map_err(request_error)?
                    .json()
                    .await
                    .map_err(request_error)?;

                addresses.into_iter().next().ok_or_else(|| {
                    NodeClientError::UnexpectedResponse("node reported no wallet addresses".into())
                })
            })
            .await
            .cloned()
    }

    async fn sponsor(&self, address: &str) -> Result<(), NodeClientError> {
        tracing::debug!(address, "node: broadcasting sponsorship");
        self.client
            .post(self.url(&format!("/sponsorship/{address}")))
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?;
        Ok(())
    }

    async fn cancel_sponsor(&self, address: &str) -> Result<(), NodeClientError> {
        tracing::debug!(address, "node: broadcasting sponsorship cancellation");
        self.client
            .delete(self.url(&format!("/sponsorship/{address}")))
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?;
        Ok(())
    }

    async fn get_sponsors_of(&self, address: &str) -> Result<Vec<String>, NodeClientError> {
        let status: SponsorshipStatus = self
            .client
            .get(self.url(&format!("/sponsorship/status/{address}")))
            .send()
            .await
            .map_err(request_error)?
            .error_for_status()
            .map_err(request_error)?
            .json()
            .await
            .map_err(request_error)?;
        Ok(status.sponsor)
    }
}
