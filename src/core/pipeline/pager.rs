//! Paginated source adapter.
//!
//! Turns a page-fetching function into a lazy item stream. Pages are fetched
//! one at a time, only after the previous page's items were handed on, so a
//! consumer that stops reading also stops the fetching.

use std::future::Future;

use tracing::{debug, trace};

use super::{Emitter, ItemStream, Scope};
use crate::error::Result;

/// One page of a remote listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor for the following page; `None` on the last page
    pub next: Option<String>,
}

impl<T> Page<T> {
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next: self.next,
        }
    }
}

/// Whether a producer ran to completion or lost its consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Done,
    Stopped,
}

/// Fetch every page and emit its items in page order.
///
/// `fetch` receives the cursor of the page to load (`None` for the first).
/// A fetch error ends the walk and is returned as-is; nothing is retried.
pub async fn pump<T, F, Fut>(mut fetch: F, out: &Emitter<T>) -> Result<Flow>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut cursor = None;
    let mut pages = 0usize;

    loop {
        let page = fetch(cursor.take()).await?;
        pages += 1;
        trace!(
            page = pages,
            items = page.items.len(),
            more = page.has_more(),
            "page fetched"
        );

        for item in page.items {
            if !out.emit(item).await {
                debug!(pages, "consumer gone, pagination stopped");
                return Ok(Flow::Stopped);
            }
        }

        match page.next {
            Some(next) => cursor = Some(next),
            None => return Ok(Flow::Done),
        }
    }
}

/// Spawn a task that streams every item of a paginated listing.
pub fn paginate<T, F, Fut>(scope: &Scope, fetch: F) -> ItemStream<T>
where
    T: Send + 'static,
    F: FnMut(Option<String>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<Page<T>>> + Send,
{
    let (out, stream) = scope.channel();
    scope.spawn("paginate", async move {
        if let Err(e) = pump(fetch, &out).await {
            out.fail(e).await;
        }
    });
    stream
}
