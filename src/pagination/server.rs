//! Server-side pagination over an offset/limit REST collection
//!
//! The paginator owns the page index and the last-known-good totals. Each
//! fetch goes through a [`RequestCache`] keyed by the page's request key, so
//! revisiting a page is served from memory and concurrent requests for the
//! same page share one network call.
//!
//! Fetches follow an explicit issue/complete cycle:
//!
//! ```text
//! issue() ──► PageRequest { seq, key } ──► fetcher ──► complete(request, result)
//! ```
//!
//! `complete` applies responses latest-wins: anything older than the newest
//! applied request is discarded, so a slow response for a page the user has
//! already left cannot roll the totals back.

use super::request_key::{build_request_key, resolve_target};
use super::types::{Applied, PageNavigator, PageRequest, PaginatorState, StickyTotals};
use crate::cache::{RequestCache, SharedResult};
use crate::error::{Error, Result};
use crate::fetch::{HttpPageFetcher, PageFetcher};
use crate::http::HttpClient;
use crate::types::PaginatedResponse;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};
use url::Url;

/// Paginates a remote collection one page per request
pub struct ServerPaginator<T, F> {
    target: Url,
    page_size: u32,
    fetcher: Arc<F>,
    cache: RequestCache<PaginatedResponse<T>>,
    current_page: u32,
    totals: StickyTotals,
    snapshot: Option<(String, Arc<PaginatedResponse<T>>)>,
    error: Option<(String, Arc<Error>)>,
    next_seq: u64,
    applied_seq: Option<u64>,
    in_flight: BTreeMap<u64, String>,
}

impl<T, F> ServerPaginator<T, F> {
    /// Create a paginator for an absolute target URL
    ///
    /// Any `limit`, `startIndex` or `totalCount` parameters already on the
    /// target are replaced in every request.
    pub fn new(target: &str, page_size: u32, fetcher: F) -> Result<Self> {
        let target = resolve_target(target, None)?;
        Self::from_url(target, page_size, fetcher)
    }

    /// Create a paginator, resolving a relative target against `origin`
    pub fn with_origin(origin: &Url, target: &str, page_size: u32, fetcher: F) -> Result<Self> {
        let target = resolve_target(target, Some(origin))?;
        Self::from_url(target, page_size, fetcher)
    }

    fn from_url(target: Url, page_size: u32, fetcher: F) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize { size: 0 });
        }

        Ok(Self {
            target,
            page_size,
            fetcher: Arc::new(fetcher),
            cache: RequestCache::default(),
            current_page: 1,
            totals: StickyTotals::default(),
            snapshot: None,
            error: None,
            next_seq: 0,
            applied_seq: None,
            in_flight: BTreeMap::new(),
        })
    }

    /// Use a shared cache instead of a private one
    #[must_use]
    pub fn with_cache(mut self, cache: RequestCache<PaginatedResponse<T>>) -> Self {
        self.cache = cache;
        self
    }

    /// Target URL without pagination parameters applied
    pub fn target(&self) -> &Url {
        &self.target
    }

    /// Requested number of items per page
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// The cache backing this paginator
    pub fn cache(&self) -> &RequestCache<PaginatedResponse<T>> {
        &self.cache
    }

    /// The fetcher backing this paginator
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Offset of the first item on the current page
    pub fn start_index(&self) -> u64 {
        u64::from(self.current_page - 1) * u64::from(self.page_size)
    }

    /// Request key for the current page
    pub fn request_key(&self) -> String {
        build_request_key(&self.target, self.page_size, self.start_index())
    }

    /// Collection size from the newest applied response
    pub fn total_count(&self) -> Option<u64> {
        self.totals.total_count
    }

    /// Item count of the newest applied page
    ///
    /// Equal to the page size except on the final page.
    pub fn current_page_size(&self) -> Option<usize> {
        self.totals.current_page_size
    }

    /// Both sticky values
    pub fn sticky_totals(&self) -> StickyTotals {
        self.totals
    }

    /// Lifecycle state
    pub fn state(&self) -> PaginatorState {
        if self.totals.total_count.is_some() {
            PaginatorState::Ready
        } else {
            PaginatorState::Uninitialized
        }
    }

    /// Response for the current page, once it has been applied
    pub fn data(&self) -> Option<&PaginatedResponse<T>> {
        let key = self.request_key();
        self.snapshot
            .as_ref()
            .filter(|(k, _)| *k == key)
            .map(|(_, page)| page.as_ref())
    }

    /// Latest failure for the current page
    pub fn error(&self) -> Option<&Arc<Error>> {
        let key = self.request_key();
        self.error
            .as_ref()
            .filter(|(k, _)| *k == key)
            .map(|(_, e)| e)
    }

    /// Whether a request for the current page is in flight
    pub fn is_loading(&self) -> bool {
        let key = self.request_key();
        self.in_flight.values().any(|k| *k == key)
    }

    /// Start a fetch for the current page
    ///
    /// The returned request must be handed back to [`Self::complete`].
    pub fn issue(&mut self) -> PageRequest {
        let seq = self.next_seq;
        self.next_seq += 1;

        let key = self.request_key();
        self.in_flight.insert(seq, key.clone());
        debug!("Issued request #{} for page {}: {}", seq, self.current_page, key);

        PageRequest {
            seq,
            page: self.current_page,
            key,
        }
    }

    /// Apply the outcome of an issued request
    pub fn complete(
        &mut self,
        request: PageRequest,
        result: SharedResult<PaginatedResponse<T>>,
    ) -> Applied {
        if request.seq >= self.next_seq {
            warn!(
                "Discarding response #{} for page {}: never issued by this paginator",
                request.seq, request.page
            );
            return Applied::Discarded;
        }
        self.in_flight.remove(&request.seq);

        if self.applied_seq.is_some_and(|latest| request.seq < latest) {
            warn!(
                "Discarding stale response #{} for page {} (latest applied #{})",
                request.seq,
                request.page,
                self.applied_seq.unwrap_or_default()
            );
            return Applied::Discarded;
        }
        self.applied_seq = Some(request.seq);
        // Anything older can only be discarded now
        self.in_flight.retain(|&seq, _| seq > request.seq);

        match result {
            Ok(page) => {
                self.totals = StickyTotals {
                    total_count: Some(page.total_count),
                    current_page_size: Some(page.results.len()),
                };
                if self.error.as_ref().is_some_and(|(k, _)| *k == request.key) {
                    self.error = None;
                }
                debug!(
                    "Applied page {} ({} items, total {})",
                    request.page,
                    page.results.len(),
                    page.total_count
                );
                self.snapshot = Some((request.key, page));
                Applied::Success
            }
            Err(e) => {
                warn!("Fetch failed for page {}: {}", request.page, e);
                self.error = Some((request.key, e));
                Applied::Failure
            }
        }
    }
}

impl<T, F> ServerPaginator<T, F>
where
    T: Send + Sync + 'static,
    F: PageFetcher<T> + 'static,
{
    /// Fetch the current page through the cache and apply the result
    pub async fn load(&mut self) -> SharedResult<PaginatedResponse<T>> {
        let request = self.issue();
        let fetcher = Arc::clone(&self.fetcher);
        let key = request.key.clone();

        let result = {
            let _guard = InFlightGuard {
                in_flight: &mut self.in_flight,
                seq: request.seq,
            };
            self.cache
                .get_or_fetch(&request.key, move || async move {
                    PageFetcher::<T>::fetch(&*fetcher, &key).await
                })
                .await
        };

        self.complete(request, result.clone());
        result
    }

    /// Drop the cached copy of the current page and fetch it again
    pub async fn revalidate(&mut self) -> SharedResult<PaginatedResponse<T>> {
        self.cache.invalidate(&self.request_key()).await;
        self.load().await
    }
}

/// Clears the in-flight entry of a `load()`, including one dropped mid-await
struct InFlightGuard<'a> {
    in_flight: &'a mut BTreeMap<u64, String>,
    seq: u64,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.remove(&self.seq);
    }
}

impl<T> ServerPaginator<T, HttpPageFetcher>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Create a paginator that fetches over HTTP
    pub fn over_http(target: &str, page_size: u32, client: HttpClient) -> Result<Self> {
        Self::new(target, page_size, HttpPageFetcher::new(client))
    }
}

impl<T, F> PageNavigator for ServerPaginator<T, F> {
    fn current_page(&self) -> u32 {
        self.current_page
    }

    fn total_pages(&self) -> Option<u32> {
        self.totals.total_count.map(|count| {
            let pages = count.div_ceil(u64::from(self.page_size));
            u32::try_from(pages).unwrap_or(u32::MAX)
        })
    }

    fn paginated(&self) -> bool {
        self.total_pages().is_some_and(|total| total > 1)
    }

    fn go_to(&mut self, page: i64) -> bool {
        let Some(total) = self.total_pages() else {
            debug!("Ignoring navigation to page {}: total pages unknown", page);
            return false;
        };

        if page <= 0 || page > i64::from(total) {
            debug!("Ignoring navigation to page {} of {}", page, total);
            return false;
        }

        let page = page as u32;
        if page == self.current_page {
            return false;
        }

        self.current_page = page;
        debug!("Server paginator moved to page {}/{}", page, total);
        true
    }
}

impl<T, F> std::fmt::Debug for ServerPaginator<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerPaginator")
            .field("target", &self.target.as_str())
            .field("page_size", &self.page_size)
            .field("current_page", &self.current_page)
            .field("totals", &self.totals)
            .field("in_flight", &self.in_flight.len())
            .finish_non_exhaustive()
    }
}
