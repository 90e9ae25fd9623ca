//! Network member wire model.

use serde::{Deserialize, Serialize};

/// A device member of the virtual network.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    /// Mesh address of the device (the network-unique node id).
    pub node_id: String,

    /// Managed network configuration for this member.
    #[serde(default)]
    pub config: MemberConfig,
}

/// Subset of the per-member managed config.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberConfig {
    /// Managed IP assignments, in assignment order.
    #[serde(default)]
    pub ip_assignments: Vec<String>,
}

impl Member {
    /// First managed IP assignment, if the member has any.
    ///
    /// Only the first assignment participates in reconciliation.
    pub fn first_ip(&self) -> Option<&str> {
        self.config.ip_assignments.first().map(String::as_str)
    }
}

/// Metadata fields pushed back to a member.
///
/// Posting the same update twice is idempotent on the control plane.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberUpdate {
    /// Human-readable member name.
    pub name: String,

    /// Free-form member description.
    pub description: String,
}
