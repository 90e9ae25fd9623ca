//! Contact wire model.

use serde::Deserialize;
use thiserror::Error;

/// A contact record from the helpdesk directory.
///
/// Only the fields the reconciliation pass consumes are modeled; everything
/// else in the API payload is ignored. The `description` field, when set,
/// conventionally carries a JSON object `{"pubkey": "..."}` correlating the
/// contact to a mesh device.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    /// Primary email address; becomes an allow-list key.
    pub email: String,

    /// Free-form description; may embed an agent pubkey as JSON.
    #[serde(default)]
    pub description: Option<String>,
}

/// Failure to extract a pubkey from a contact description.
#[derive(Debug, Error)]
pub enum PubkeyError {
    /// Description is not valid JSON.
    #[error("description is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Description parsed, but has no string `pubkey` field.
    #[error("description has no \"pubkey\" field")]
    MissingField,
}

#[derive(Debug, Deserialize)]
struct DescriptionFields {
    #[serde(default)]
    pubkey: Option<String>,
}

impl Contact {
    /// Extract the agent pubkey embedded in the description, if any.
    ///
    /// Returns `None` when the description is absent or empty — such
    /// contacts simply have no device correlation. A present description
    /// that is not valid JSON or lacks a string `pubkey` field yields
    /// `Some(Err(_))`; deciding whether that is fatal is the caller's call.
    pub fn embedded_pubkey(&self) -> Option<Result<String, PubkeyError>> {
        let description = self.description.as_deref().filter(|d| !d.is_empty())?;

        let parsed = match serde_json::from_str::<DescriptionFields>(description) {
            Ok(fields) => fields,
            Err(e) => return Some(Err(e.into())),
        };

        Some(parsed.pubkey.ok_or(PubkeyError::MissingField))
    }
}
