//! Connector error types
//!
//! Error definitions with transient/permanent classification for retry logic.

use thiserror::Error;

/// Error that can occur while talking to a remote service.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// Remote service answered with a non-success HTTP status.
    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    /// Network-level failure: connect, TLS, timeout, broken transfer.
    #[error("transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Response body could not be decoded into the expected shape.
    #[error("failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Client was constructed with unusable configuration.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },
}

impl ConnectorError {
    /// Check if this error is transient and the operation may be retried.
    ///
    /// Transport failures and throttling/server statuses may resolve on
    /// their own; everything else requires intervention.
    pub fn is_transient(&self) -> bool {
        match self {
            ConnectorError::Transport { .. } => true,
            ConnectorError::HttpStatus { status, .. } => {
                matches!(status, 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }

    /// Check if this error is permanent and retry won't help.
    pub fn is_permanent(&self) -> bool {
        !self.is_transient()
    }

    // Convenience constructors

    /// Create an HTTP status error from a response's status and URL.
    pub fn http_status(status: reqwest::StatusCode, url: impl Into<String>) -> Self {
        ConnectorError::HttpStatus {
            status: status.as_u16(),
            url: url.into(),
        }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: None,
        }
    }

    /// Create a transport error with source.
    pub fn transport_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ConnectorError::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a decode error.
    pub fn decode(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        ConnectorError::Decode {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Create an invalid configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        ConnectorError::InvalidConfiguration {
            message: message.into(),
        }
    }
}

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;
