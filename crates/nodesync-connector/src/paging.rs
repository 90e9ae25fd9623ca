//! Paged fetching over remote collections.
//!
//! Two strategies are supported, matching the two APIs that need them:
//!
//! - **Numbered pages**: 1-indexed integer pages, terminated by the first
//!   empty page. A fixed delay is awaited after every request issued,
//!   including the final empty-returning one, to honor the remote
//!   rate-limit policy.
//! - **Opaque cursors**: each response carries a continuation cursor; an
//!   empty or absent cursor ends the listing. No delay.
//!
//! Either strategy discards accumulated items and propagates on the first
//! error; a fetch is never resumable mid-run.

use std::future::Future;
use std::time::Duration;

use tracing::debug;

use crate::error::ConnectorResult;

/// One page of a cursor-paginated listing.
#[derive(Debug, Clone)]
pub struct CursorPage<T> {
    /// Items on this page.
    pub items: Vec<T>,

    /// Continuation cursor; `None` or empty means the listing is complete.
    pub cursor: Option<String>,
}

/// Fetch every page of a numbered-page collection, concatenated in order.
///
/// `fetch` is called with 1-indexed page numbers until it returns an empty
/// page. `delay` is awaited once per request issued.
pub async fn fetch_numbered_pages<T, F, Fut>(
    mut fetch: F,
    delay: Duration,
) -> ConnectorResult<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ConnectorResult<Vec<T>>>,
{
    let mut items = Vec::new();
    let mut page: u32 = 1;

    loop {
        let batch = fetch(page).await?;
        // The remote rate limit counts requests, not payloads; the delay
        // applies to the empty terminating request as well.
        tokio::time::sleep(delay).await;

        if batch.is_empty() {
            debug!(pages = page, total = items.len(), "numbered paging complete");
            return Ok(items);
        }

        items.extend(batch);
        page += 1;
    }
}

/// Fetch every page of a cursor-paginated collection, concatenated in order.
///
/// `fetch` is called with `None` first, then with each returned cursor,
/// until a page comes back with no cursor (or an empty one).
pub async fn fetch_cursor_pages<T, F, Fut>(mut fetch: F) -> ConnectorResult<Vec<T>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = ConnectorResult<CursorPage<T>>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;
    let mut requests: u32 = 0;

    loop {
        let page = fetch(cursor.take()).await?;
        requests += 1;
        items.extend(page.items);

        match page.cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => {
                debug!(requests, total = items.len(), "cursor paging complete");
                return Ok(items);
            }
        }
    }
}
