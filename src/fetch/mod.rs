//! Page fetchers
//!
//! A fetcher turns a request key (a fully built URL) into one
//! [`PaginatedResponse`](crate::types::PaginatedResponse).
//!
//! - [`HttpPageFetcher`]: GET over HTTP and decode JSON (the default)
//! - [`FnFetcher`]: adapt any async closure
//! - [`RangeSource`]: synthetic integer collection for demos and tests

mod fetcher;
mod range;

pub use fetcher::{fetch_fn, FnFetcher, HttpPageFetcher, PageFetcher};
pub use range::RangeSource;

#[cfg(test)]
mod tests;
