//! Freshdesk contact directory client.
//!
//! Fetches the complete contact set for a fixed company scope through the
//! numbered-page contact listing endpoint, honoring Freshdesk's per-request
//! rate limit with a mandatory inter-page delay.

pub mod client;
pub mod models;

pub use client::{ContactDirectory, FreshdeskClient};
pub use models::{Contact, PubkeyError};
