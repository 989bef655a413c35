//! Request cache module
//!
//! A keyed cache that deduplicates concurrent fetches for the same request
//! key and keeps successful results until they expire.
//!
//! # Overview
//!
//! The server paginator derives one request key per logical page. Routing
//! every fetch through [`RequestCache`] means navigating back to a page that
//! was already loaded is served from memory, and two callers asking for the
//! same key while a request is in flight share one network call.

mod store;

pub use store::{CacheConfig, RequestCache, SharedResult};
