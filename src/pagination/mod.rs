//! Pagination module
//!
//! Supports: in-memory (client-side) and offset/limit (server-side) pagination
//!
//! # Overview
//!
//! Both paginators implement [`PageNavigator`], so code that renders page
//! controls can treat them the same way:
//!
//! - [`ClientPaginator`] slices a collection that is already loaded.
//!   Out-of-range targets are clamped.
//! - [`ServerPaginator`] asks a [`PageFetcher`](crate::fetch::PageFetcher)
//!   for one page at a time and keeps the collection size it last saw while
//!   the next page loads. Out-of-range targets are ignored, and until the
//!   first response arrives every navigation is ignored.

mod client;
pub mod request_key;
mod server;
mod types;

pub use client::{ClientPaginator, DEFAULT_PAGE_SIZE};
pub use request_key::build_request_key;
pub use server::ServerPaginator;
pub use types::{Applied, PageNavigator, PageRequest, PaginatorState, StickyTotals};
