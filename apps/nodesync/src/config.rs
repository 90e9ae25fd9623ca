use std::time::Duration;

/// Configuration for one reconciliation run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Freshdesk instance base URL (e.g. `https://acme.freshdesk.com`).
    pub freshdesk_base_url: String,

    /// Freshdesk API key; sent as the basic-auth username.
    pub freshdesk_api_key: String,

    /// Company id scoping the contact listing.
    pub freshdesk_company_id: u64,

    /// Delay between contact page requests. Freshdesk throttles per
    /// request, so this applies once per page including the final empty one.
    pub freshdesk_page_delay: Duration,

    /// ZeroTier Central base URL.
    pub zerotier_base_url: String,

    /// ZeroTier Central API token.
    pub zerotier_api_token: String,

    /// Virtual network whose members are reconciled.
    pub zerotier_network_id: String,

    /// Retry budget for Central API requests.
    pub zerotier_max_retries: u32,

    /// Cloudflare API base URL.
    pub cloudflare_base_url: String,

    /// Cloudflare API token with Workers KV read/write scope.
    pub cloudflare_api_token: String,

    /// Cloudflare account owning the KV namespaces.
    pub cloudflare_account_id: String,

    /// KV namespace id for the email allow-list (write side).
    pub allowlist_namespace_id: String,

    /// KV namespace id for the agent-id→IPv4 cache (read side).
    pub agent_ipv4_namespace_id: String,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let require = |key: &str| reader(key).map_err(|_| ConfigError::MissingVar(key.into()));

        let freshdesk_base_url = require("FRESHDESK_BASE_URL")?;
        let freshdesk_api_key = require("FRESHDESK_API_KEY")?;

        let freshdesk_company_id = require("FRESHDESK_COMPANY_ID")?
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidValue("FRESHDESK_COMPANY_ID".into(), e.to_string()))?;

        let freshdesk_page_delay_ms = reader("FRESHDESK_PAGE_DELAY_MS")
            .unwrap_or_else(|_| "1000".to_string())
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidValue("FRESHDESK_PAGE_DELAY_MS".into(), e.to_string())
            })?;

        let zerotier_base_url = reader("ZEROTIER_BASE_URL")
            .unwrap_or_else(|_| "https://my.zerotier.com".to_string());
        let zerotier_api_token = require("ZEROTIER_CENTRAL_API_TOKEN")?;
        let zerotier_network_id = require("ZEROTIER_NETWORK_ID")?;

        let zerotier_max_retries = reader("ZEROTIER_MAX_RETRIES")
            .unwrap_or_else(|_| "5".to_string())
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidValue("ZEROTIER_MAX_RETRIES".into(), e.to_string()))?;

        let cloudflare_base_url = reader("CLOUDFLARE_BASE_URL")
            .unwrap_or_else(|_| "https://api.cloudflare.com/client/v4".to_string());
        let cloudflare_api_token = require("CLOUDFLARE_API_TOKEN")?;
        let cloudflare_account_id = require("CLOUDFLARE_ACCOUNT_ID")?;
        let allowlist_namespace_id = require("CLOUDFLARE_ALLOWLIST_NAMESPACE_ID")?;
        let agent_ipv4_namespace_id = require("CLOUDFLARE_AGENT_IPV4_NAMESPACE_ID")?;

        Ok(Self {
            freshdesk_base_url,
            freshdesk_api_key,
            freshdesk_company_id,
            freshdesk_page_delay: Duration::from_millis(freshdesk_page_delay_ms),
            zerotier_base_url,
            zerotier_api_token,
            zerotier_network_id,
            zerotier_max_retries,
            cloudflare_base_url,
            cloudflare_api_token,
            cloudflare_account_id,
            allowlist_namespace_id,
            agent_ipv4_namespace_id,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
