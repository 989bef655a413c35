//! HTTP client module
//!
//! Provides the HTTP client behind the default page fetcher.

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder};
