//! Shared plumbing for the nodesync service connectors.
//!
//! Everything that more than one connector needs lives here: the error
//! taxonomy with transient/permanent classification, the retry policy used
//! for flaky endpoints, and the two paged-fetch strategies (numbered pages
//! with a rate-limit delay, opaque cursors without one).

pub mod error;
pub mod paging;
pub mod retry;

pub use error::{ConnectorError, ConnectorResult};
pub use paging::CursorPage;
pub use retry::RetryPolicy;
