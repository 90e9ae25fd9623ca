//! Derived mappings between the three datasets.
//!
//! All maps are constructed fresh each run and never persisted.

use std::collections::HashMap;

use nodesync_zerotier::Member;

/// Sentinel the provisioning agent writes into the IPv4 cache before a
/// device has received an assignment.
pub const UNASSIGNED_IPV4: &str = "undefined";

/// Build the IPv4 → mesh-address map from the member set.
///
/// Only the first IP assignment of each member counts; members with no
/// assignment are excluded. Duplicate first IPs are last-write-wins in
/// listing order.
pub fn ipv4_to_node_map(members: &[Member]) -> HashMap<String, String> {
    members
        .iter()
        .filter_map(|m| Some((m.first_ip()?.to_string(), m.node_id.clone())))
        .collect()
}

/// Compose agent-id → mesh-address by joining the cached agent→IPv4 map
/// with the IPv4 → mesh-address map.
///
/// Cache entries holding the unassigned sentinel are discarded, and agent
/// ids whose IPv4 resolves to no known member are dropped silently — both
/// are expected states, not errors.
pub fn agent_to_node_map(
    agent_to_ipv4: &HashMap<String, String>,
    ipv4_to_node: &HashMap<String, String>,
) -> HashMap<String, String> {
    agent_to_ipv4
        .iter()
        .filter(|(_, ipv4)| ipv4.as_str() != UNASSIGNED_IPV4)
        .filter_map(|(agent_id, ipv4)| {
            let node = ipv4_to_node.get(ipv4)?;
            Some((agent_id.clone(), node.clone()))
        })
        .collect()
}
