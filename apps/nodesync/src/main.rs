mod config;

use tracing_subscriber::EnvFilter;

use nodesync_connector::RetryPolicy;
use nodesync_engine::{EngineConfig, ReconcileEngine};
use nodesync_freshdesk::FreshdeskClient;
use nodesync_workers_kv::WorkersKvClient;
use nodesync_zerotier::ZeroTierClient;

use crate::config::AppConfig;

#[tokio::main]
async fn main() {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,nodesync=debug")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        std::process::exit(1);
    });

    tracing::info!(
        company_id = config.freshdesk_company_id,
        network_id = %config.zerotier_network_id,
        "starting reconciliation run"
    );

    let directory = FreshdeskClient::new(
        &config.freshdesk_base_url,
        &config.freshdesk_api_key,
        config.freshdesk_company_id,
        config.freshdesk_page_delay,
    )
    .unwrap_or_else(|e| {
        eprintln!("Freshdesk client error: {e}");
        std::process::exit(1);
    });

    let mesh = ZeroTierClient::new(
        &config.zerotier_base_url,
        &config.zerotier_api_token,
        &config.zerotier_network_id,
        RetryPolicy::new(config.zerotier_max_retries),
    )
    .unwrap_or_else(|e| {
        eprintln!("ZeroTier client error: {e}");
        std::process::exit(1);
    });

    let kv = WorkersKvClient::new(
        &config.cloudflare_base_url,
        &config.cloudflare_api_token,
        &config.cloudflare_account_id,
    )
    .unwrap_or_else(|e| {
        eprintln!("Cloudflare client error: {e}");
        std::process::exit(1);
    });

    let engine = ReconcileEngine::new(
        directory,
        mesh,
        kv,
        EngineConfig {
            allowlist_namespace: config.allowlist_namespace_id,
            agent_ipv4_namespace: config.agent_ipv4_namespace_id,
        },
    );

    let report = engine.run().await.unwrap_or_else(|e| {
        eprintln!("Reconciliation error: {e}");
        std::process::exit(1);
    });

    tracing::info!(
        members = report.members,
        contacts = report.contacts,
        allowlisted = report.allowlisted,
        metadata_updates = report.metadata_updates,
        skipped_descriptions = report.skipped_descriptions,
        "reconciliation run complete"
    );
}
