//! Workers KV HTTP client (reqwest-based).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use nodesync_connector::error::{ConnectorError, ConnectorResult};
use nodesync_connector::paging::{self, CursorPage};

/// Key-value store addressed by namespace id.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read one value as raw text. Fails for absent keys; only call this
    /// for keys already discovered via listing.
    async fn get_value(&self, namespace_id: &str, key: &str) -> ConnectorResult<String>;

    /// List every key name in the namespace, following cursors.
    async fn list_all_keys(&self, namespace_id: &str) -> ConnectorResult<Vec<String>>;

    /// Upsert every given entry in one bulk write. Keys not named are left
    /// untouched.
    async fn set_all_entries(
        &self,
        namespace_id: &str,
        entries: &HashMap<String, String>,
    ) -> ConnectorResult<()>;

    /// Read the whole namespace as a map: one listing plus one value read
    /// per key. No read batching exists in the API.
    async fn get_all_entries(
        &self,
        namespace_id: &str,
    ) -> ConnectorResult<HashMap<String, String>> {
        let keys = self.list_all_keys(namespace_id).await?;
        let mut entries = HashMap::with_capacity(keys.len());
        for key in keys {
            let value = self.get_value(namespace_id, &key).await?;
            entries.insert(key, value);
        }
        Ok(entries)
    }
}

#[derive(Debug, Deserialize)]
struct ListKeysResponse {
    #[serde(default)]
    result: Vec<KeyName>,
    #[serde(default)]
    result_info: ResultInfo,
}

#[derive(Debug, Deserialize)]
struct KeyName {
    name: String,
}

#[derive(Debug, Default, Deserialize)]
struct ResultInfo {
    #[serde(default)]
    cursor: Option<String>,
}

#[derive(Debug, Serialize)]
struct BulkEntry<'a> {
    key: &'a str,
    value: &'a str,
    base64: bool,
}

/// Workers KV API client scoped to a single account.
#[derive(Clone)]
pub struct WorkersKvClient {
    base_url: String,
    api_token: String,
    account_id: String,
    http_client: Client,
}

impl std::fmt::Debug for WorkersKvClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkersKvClient")
            .field("base_url", &self.base_url)
            .field("api_token", &"[REDACTED]")
            .field("account_id", &self.account_id)
            .finish()
    }
}

impl WorkersKvClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        account_id: impl Into<String>,
    ) -> ConnectorResult<Self> {
        let base_url = base_url.into();
        if base_url.is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "Cloudflare base URL must not be empty",
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
            account_id: account_id.into(),
            http_client,
        })
    }

    fn namespace_url(&self, namespace_id: &str) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}",
            self.base_url, self.account_id, namespace_id
        )
    }

    async fn fetch_key_page(
        &self,
        namespace_id: &str,
        cursor: Option<String>,
    ) -> ConnectorResult<CursorPage<String>> {
        let url = format!("{}/keys", self.namespace_url(namespace_id));

        let mut request = self.http_client.get(&url).bearer_auth(&self.api_token);
        if let Some(cursor) = cursor.as_deref() {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ConnectorError::transport_with_source("key listing failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        let body = response
            .json::<ListKeysResponse>()
            .await
            .map_err(|e| ConnectorError::decode(&url, e))?;

        Ok(CursorPage {
            items: body.result.into_iter().map(|k| k.name).collect(),
            cursor: body.result_info.cursor,
        })
    }
}

#[async_trait]
impl KvStore for WorkersKvClient {
    #[instrument(skip(self))]
    async fn get_value(&self, namespace_id: &str, key: &str) -> ConnectorResult<String> {
        let url = format!("{}/values/{}", self.namespace_url(namespace_id), key);

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.api_token)
            .send()
            .await
            .map_err(|e| ConnectorError::transport_with_source("value read failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        response
            .text()
            .await
            .map_err(|e| ConnectorError::transport_with_source("value body read failed", e))
    }

    #[instrument(skip(self))]
    async fn list_all_keys(&self, namespace_id: &str) -> ConnectorResult<Vec<String>> {
        let keys =
            paging::fetch_cursor_pages(|cursor| self.fetch_key_page(namespace_id, cursor)).await?;

        debug!(namespace_id, count = keys.len(), "listed namespace keys");
        Ok(keys)
    }

    #[instrument(skip(self, entries))]
    async fn set_all_entries(
        &self,
        namespace_id: &str,
        entries: &HashMap<String, String>,
    ) -> ConnectorResult<()> {
        let url = format!("{}/bulk", self.namespace_url(namespace_id));

        let payload: Vec<BulkEntry<'_>> = entries
            .iter()
            .map(|(key, value)| BulkEntry {
                key,
                value,
                base64: false,
            })
            .collect();

        let response = self
            .http_client
            .put(&url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ConnectorError::transport_with_source("bulk write failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::http_status(status, &url));
        }

        debug!(namespace_id, count = payload.len(), "bulk-wrote entries");
        Ok(())
    }
}
