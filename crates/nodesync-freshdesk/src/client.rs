//! Freshdesk HTTP client (reqwest-based).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument};

use nodesync_connector::error::{ConnectorError, ConnectorResult};
use nodesync_connector::paging;

use crate::models::Contact;

/// Read side of the helpdesk contact directory.
#[async_trait]
pub trait ContactDirectory: Send + Sync {
    /// Fetch every contact in the configured company scope.
    async fn fetch_all_contacts(&self) -> ConnectorResult<Vec<Contact>>;
}

/// Freshdesk API client scoped to a single company.
///
/// Authenticates with basic auth, API key as username and `_` as password,
/// per the Freshdesk convention.
#[derive(Clone)]
pub struct FreshdeskClient {
    base_url: String,
    api_key: String,
    company_id: u64,
    /// Mandatory delay between page requests (Freshdesk rate limit).
    page_delay: Duration,
    http_client: Client,
}

impl std::fmt::Debug for FreshdeskClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshdeskClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .field("company_id", &self.company_id)
            .field("page_delay", &self.page_delay)
            .finish()
    }
}

impl FreshdeskClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        company_id: u64,
        page_delay: Duration,
    ) -> ConnectorResult<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "Freshdesk base URL must not be empty",
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
            api_key: api_key.into(),
            company_id,
            page_delay,
            http_client,
        })
    }

    /// Fetch a single contact page (1-indexed).
    async fn fetch_page(&self, page: u32) -> ConnectorResult<Vec<Contact>> {
        let url = format!("{}/api/v2/contacts", self.base_url);

        debug!(page, company_id = self.company_id, "fetching contact page");

        let response = self
            .http_client
            .get(&url)
            .basic_auth(&self.api_key, Some("_"))
            .query(&[
                ("company_id", self.company_id.to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .map_err(|e| ConnectorError::transport_with_source("contact page request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        response
            .json::<Vec<Contact>>()
            .await
            .map_err(|e| ConnectorError::decode(&url, e))
    }
}

#[async_trait]
impl ContactDirectory for FreshdeskClient {
    #[instrument(skip(self), fields(company_id = self.company_id))]
    async fn fetch_all_contacts(&self) -> ConnectorResult<Vec<Contact>> {
        let contacts =
            paging::fetch_numbered_pages(|page| self.fetch_page(page), self.page_delay).await?;

        debug!(count = contacts.len(), "fetched all contacts");
        Ok(contacts)
    }
}
