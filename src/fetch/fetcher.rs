//! Fetcher trait and the standard implementations

use crate::error::Result;
use crate::http::HttpClient;
use crate::types::PaginatedResponse;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::marker::PhantomData;

/// Fetches one page for a request key
#[async_trait]
pub trait PageFetcher<T>: Send + Sync {
    /// Fetch the page addressed by `key`
    async fn fetch(&self, key: &str) -> Result<PaginatedResponse<T>>;
}

// ============================================================================
// HTTP Fetcher
// ============================================================================

/// Default fetcher: `GET key` and decode the JSON body
#[derive(Debug, Clone)]
pub struct HttpPageFetcher {
    client: HttpClient,
}

impl HttpPageFetcher {
    /// Create a fetcher over an HTTP client
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// The underlying client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }
}

#[async_trait]
impl<T> PageFetcher<T> for HttpPageFetcher
where
    T: DeserializeOwned + Send + 'static,
{
    async fn fetch(&self, key: &str) -> Result<PaginatedResponse<T>> {
        self.client.get_json(key).await
    }
}

// ============================================================================
// Closure Fetcher
// ============================================================================

/// Fetcher backed by an async closure taking the request key
pub struct FnFetcher<F, Fut> {
    f: F,
    _marker: PhantomData<fn() -> Fut>,
}

/// Wrap an async closure as a [`PageFetcher`]
///
/// ```rust,ignore
/// let fetcher = fetch_fn(|key: String| async move {
///     Ok(PaginatedResponse::new(vec![key], 1))
/// });
/// ```
pub fn fetch_fn<F, Fut>(f: F) -> FnFetcher<F, Fut> {
    FnFetcher {
        f,
        _marker: PhantomData,
    }
}

#[async_trait]
impl<T, F, Fut> PageFetcher<T> for FnFetcher<F, Fut>
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<PaginatedResponse<T>>> + Send + 'static,
    T: Send + 'static,
{
    async fn fetch(&self, key: &str) -> Result<PaginatedResponse<T>> {
        (self.f)(key.to_string()).await
    }
}

impl<F, Fut> std::fmt::Debug for FnFetcher<F, Fut> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnFetcher").finish_non_exhaustive()
    }
}
