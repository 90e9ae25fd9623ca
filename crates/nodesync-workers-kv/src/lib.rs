//! Cloudflare Workers KV namespace client.
//!
//! Reads and writes account-scoped KV namespaces: cursor-paginated key
//! listing, raw-text value reads, and a single bulk upsert on the write
//! path. Two namespaces act as separate logical tables for the
//! reconciliation pass: an agent-id→IPv4 cache (read) and an email
//! allow-list (write).

pub mod client;

pub use client::{KvStore, WorkersKvClient};
