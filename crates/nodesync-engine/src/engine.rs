//! Reconciliation pass orchestration.

use std::collections::HashMap;

use tracing::{debug, info, instrument, warn};

use nodesync_connector::error::ConnectorResult;
use nodesync_freshdesk::ContactDirectory;
use nodesync_workers_kv::KvStore;
use nodesync_zerotier::{MemberUpdate, MeshNetwork};

use crate::mappings;

/// Placeholder value stored under each allow-list key; presence of the key
/// is the only meaningful signal.
pub const ALLOWLIST_PLACEHOLDER: &str = "{}";

/// Namespace wiring for the engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// KV namespace holding the email allow-list (write side).
    pub allowlist_namespace: String,

    /// KV namespace holding the agent-id→IPv4 cache (read side).
    pub agent_ipv4_namespace: String,
}

/// Summary of one reconciliation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    /// Mesh members listed.
    pub members: usize,
    /// Agent-id→IPv4 cache entries read (before filtering).
    pub cached_agents: usize,
    /// Agent ids that resolved to a mesh address.
    pub resolved_agents: usize,
    /// Contacts fetched from the directory.
    pub contacts: usize,
    /// Emails written to the allow-list.
    pub allowlisted: usize,
    /// Mesh metadata updates issued.
    pub metadata_updates: usize,
    /// Contacts skipped because their description would not yield a pubkey.
    pub skipped_descriptions: usize,
}

/// Single-pass reconciliation across the three services.
///
/// The engine owns nothing but the injected clients and its namespace
/// wiring; a run is stateless and linear, and every step is independently
/// idempotent, so a failed run is simply re-run.
pub struct ReconcileEngine<D, M, K> {
    directory: D,
    mesh: M,
    kv: K,
    config: EngineConfig,
}

impl<D, M, K> ReconcileEngine<D, M, K>
where
    D: ContactDirectory,
    M: MeshNetwork,
    K: KvStore,
{
    /// Create an engine over the three injected clients.
    pub fn new(directory: D, mesh: M, kv: K, config: EngineConfig) -> Self {
        Self {
            directory,
            mesh,
            kv,
            config,
        }
    }

    /// Run one full reconciliation pass.
    ///
    /// Remote failures abort immediately; already-applied writes stay
    /// applied. Contacts whose description cannot yield a pubkey are
    /// logged and skipped without affecting the allow-list.
    #[instrument(skip(self))]
    pub async fn run(&self) -> ConnectorResult<ReconcileReport> {
        let mut report = ReconcileReport::default();

        // Resolve devices: IPv4 → mesh address from the member set.
        let members = self.mesh.list_members().await?;
        report.members = members.len();
        let ipv4_to_node = mappings::ipv4_to_node_map(&members);
        debug!(
            members = report.members,
            addressable = ipv4_to_node.len(),
            "built ipv4→node map"
        );

        // Resolve agents: agent id → mesh address via the cached IPv4 map.
        let agent_to_ipv4 = self
            .kv
            .get_all_entries(&self.config.agent_ipv4_namespace)
            .await?;
        report.cached_agents = agent_to_ipv4.len();
        let agent_to_node = mappings::agent_to_node_map(&agent_to_ipv4, &ipv4_to_node);
        report.resolved_agents = agent_to_node.len();
        debug!(
            cached = report.cached_agents,
            resolved = report.resolved_agents,
            "built agent→node map"
        );

        // Refresh the allow-list: full upsert of every current contact email.
        let contacts = self.directory.fetch_all_contacts().await?;
        report.contacts = contacts.len();

        let allowlist: HashMap<String, String> = contacts
            .iter()
            .map(|c| (c.email.clone(), ALLOWLIST_PLACEHOLDER.to_string()))
            .collect();
        report.allowlisted = allowlist.len();
        self.kv
            .set_all_entries(&self.config.allowlist_namespace, &allowlist)
            .await?;
        info!(emails = report.allowlisted, "refreshed allow-list");

        // Push contact metadata to every correlated mesh member.
        for contact in &contacts {
            let pubkey = match contact.embedded_pubkey() {
                None => continue,
                Some(Err(e)) => {
                    warn!(email = %contact.email, error = %e, "skipping contact: unusable description");
                    report.skipped_descriptions += 1;
                    continue;
                }
                Some(Ok(pubkey)) => pubkey,
            };

            let Some(node) = agent_to_node.get(&pubkey) else {
                // Agent not (yet) provisioned on the network; nothing to tag.
                continue;
            };

            let update = MemberUpdate {
                name: pubkey.clone(),
                description: contact.email.clone(),
            };
            self.mesh.update_member(node, &update).await?;
            report.metadata_updates += 1;
        }

        info!(
            updates = report.metadata_updates,
            skipped = report.skipped_descriptions,
            "reconciliation pass complete"
        );
        Ok(report)
    }
}
