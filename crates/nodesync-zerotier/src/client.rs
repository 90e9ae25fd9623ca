//! ZeroTier Central HTTP client (reqwest-based).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use nodesync_connector::error::{ConnectorError, ConnectorResult};
use nodesync_connector::retry::{send_with_retry, RetryPolicy};

use crate::models::{Member, MemberUpdate};

/// Mesh-networking control plane for a single virtual network.
#[async_trait]
pub trait MeshNetwork: Send + Sync {
    /// List every member of the configured network.
    async fn list_members(&self) -> ConnectorResult<Vec<Member>>;

    /// Push metadata to a specific member, addressed by mesh address.
    ///
    /// The result may be ignored by callers that treat the push as
    /// best-effort, but failures are always observable.
    async fn update_member(&self, address: &str, update: &MemberUpdate) -> ConnectorResult<()>;
}

/// ZeroTier Central API client scoped to a single network.
#[derive(Clone)]
pub struct ZeroTierClient {
    base_url: String,
    api_token: String,
    network_id: String,
    retry: RetryPolicy,
    http_client: Client,
}

impl std::fmt::Debug for ZeroTierClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZeroTierClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("network_id", &self.network_id)
            .field("retry", &self.retry)
            .finish()
    }
}

impl ZeroTierClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        network_id: impl Into<String>,
        retry: RetryPolicy,
    ) -> ConnectorResult<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "ZeroTier base URL must not be empty",
            ));
        }

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| {
                ConnectorError::invalid_configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.into(),
            network_id: network_id.into(),
            retry,
            http_client,
        })
    }

    fn member_collection_url(&self) -> String {
        format!("{}/api/network/{}/member", self.base_url, self.network_id)
    }
}

#[async_trait]
impl MeshNetwork for ZeroTierClient {
    #[instrument(skip(self), fields(network_id = %self.network_id))]
    async fn list_members(&self) -> ConnectorResult<Vec<Member>> {
        let url = self.member_collection_url();

        let request = self.http_client.get(&url).bearer_auth(&self.api_token);
        let response = send_with_retry(request, &self.retry).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        let members = response
            .json::<Vec<Member>>()
            .await
            .map_err(|e| ConnectorError::decode(&url, e))?;

        debug!(count = members.len(), "listed network members");
        Ok(members)
    }

    #[instrument(skip(self, update), fields(network_id = %self.network_id))]
    async fn update_member(&self, address: &str, update: &MemberUpdate) -> ConnectorResult<()> {
        let url = format!("{}/{}", self.member_collection_url(), address);

        let request = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_token)
            .json(update);
        let response = send_with_retry(request, &self.retry).await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        debug!(address, name = %update.name, "updated member metadata");
        Ok(())
    }
}
