//! ZeroTier Central network membership client.
//!
//! Lists the device members of a fixed virtual network and pushes per-member
//! metadata (name, description) back to the control plane. The Central API
//! endpoint is flaky enough that every request goes through the shared retry
//! policy.

pub mod client;
pub mod models;

pub use client::{MeshNetwork, ZeroTierClient};
pub use models::{Member, MemberConfig, MemberUpdate};
