//! Synthetic paginated source
//!
//! Serves the integers `0..total` as an offset/limit paginated collection.
//! Useful for exercising paginators without a server.

use super::fetcher::PageFetcher;
use crate::error::Result;
use crate::pagination::request_key::{
    query_number, set_query_params, LIMIT_PARAM, START_INDEX_PARAM,
};
use crate::types::{PageLink, PaginatedResponse};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;
use url::Url;

const DEFAULT_LIMIT: u64 = 50;

/// In-memory collection of `0..total` answering offset/limit requests
#[derive(Debug, Clone)]
pub struct RangeSource {
    total: u64,
    delay: Option<Duration>,
    requests: Arc<AtomicUsize>,
}

impl RangeSource {
    /// Create a source of `total` items
    pub fn new(total: u64) -> Self {
        Self {
            total,
            delay: None,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Sleep before answering each request
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Collection size
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of requests served so far (shared between clones)
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Build the page a request key asks for
    ///
    /// `limit` defaults to 50 and `startIndex` to 0 when absent or malformed.
    pub fn page_for(&self, key: &Url) -> PaginatedResponse<u64> {
        let limit = query_number(key, LIMIT_PARAM).unwrap_or(DEFAULT_LIMIT);
        let start = query_number(key, START_INDEX_PARAM).unwrap_or(0);

        let end = start.saturating_add(limit).min(self.total);
        let results: Vec<u64> = (start.min(end)..end).collect();

        let mut page = PaginatedResponse::new(results, self.total);
        if start.saturating_add(limit) < self.total {
            let next = set_query_params(key, &[(START_INDEX_PARAM, (start + limit).to_string())]);
            page = page.with_link(PageLink::next(next.to_string()));
        }
        page
    }
}

#[async_trait]
impl PageFetcher<u64> for RangeSource {
    async fn fetch(&self, key: &str) -> Result<PaginatedResponse<u64>> {
        let url = Url::parse(key)?;
        self.requests.fetch_add(1, Ordering::SeqCst);
        debug!("Range source serving {}", key);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        Ok(self.page_for(&url))
    }
}
