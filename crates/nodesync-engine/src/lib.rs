//! Identity reconciliation engine.
//!
//! Cross-references three datasets — helpdesk contacts, mesh network
//! members, and the KV agent-id→IPv4 cache — and applies two idempotent
//! side effects: a full refresh of the email allow-list and a metadata push
//! to every mesh member correlated with a contact.

pub mod engine;
pub mod mappings;

pub use engine::{EngineConfig, ReconcileEngine, ReconcileReport, ALLOWLIST_PLACEHOLDER};
