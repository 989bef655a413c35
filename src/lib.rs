// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # pagewise
//!
//! Paginate collections for list views: slice an in-memory list into pages,
//! or page through an offset/limit REST collection one request at a time.
//!
//! ## Features
//!
//! - **Client-side pagination**: fixed-size pages over a loaded list, with
//!   clamped navigation
//! - **Server-side pagination**: `limit`/`startIndex`/`totalCount` requests,
//!   totals that stay put while the next page loads, latest-wins responses
//! - **Request cache**: revisited pages come from memory and concurrent
//!   requests for the same page share one fetch
//! - **Pluggable fetchers**: HTTP by default, any async closure, or a
//!   synthetic source for demos
//! - **Age formatting**: compact "3 yrs, 2 mths" style ages
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pagewise::{HttpClient, PageNavigator, ServerPaginator, JsonValue};
//!
//! #[tokio::main]
//! async fn main() -> pagewise::Result<()> {
//!     let mut patients: ServerPaginator<JsonValue, _> = ServerPaginator::over_http(
//!         "https://emr.example.org/openmrs/ws/rest/v1/patient?q=john",
//!         50,
//!         HttpClient::new()?,
//!     )?;
//!
//!     patients.load().await.ok();
//!     println!("page {} of {:?}", patients.current_page(), patients.total_pages());
//!
//!     if patients.go_to_next() {
//!         patients.load().await.ok();
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                      PageNavigator                        │
//! │  current_page  total_pages  go_to  go_to_next/previous    │
//! └───────────────────────────────────────────────────────────┘
//!          │                              │
//! ┌────────┴────────┐   ┌────────────────┴──────────────────┐
//! │ ClientPaginator │   │ ServerPaginator                    │
//! │ slice a Vec     │   │ request key ─► RequestCache        │
//! │ clamp targets   │   │             ─► PageFetcher (HTTP)  │
//! └─────────────────┘   └────────────────────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Keyed request cache with in-flight deduplication
pub mod cache;

/// HTTP client
pub mod http;

/// Page fetchers
pub mod fetch;

/// Client-side and server-side paginators
pub mod pagination;

/// Age formatting
pub mod age;

/// YAML configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use cache::{CacheConfig, RequestCache};
pub use fetch::{fetch_fn, HttpPageFetcher, PageFetcher, RangeSource};
pub use http::{HttpClient, HttpClientConfig};
pub use pagination::{ClientPaginator, PageNavigator, ServerPaginator};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
