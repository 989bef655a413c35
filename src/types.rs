//! Common types used throughout pagewise
//!
//! This module contains the wire shapes shared by the fetchers, the request
//! cache and the server paginator.

use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Paginated Response
// ============================================================================

/// Relation of a navigation link returned alongside a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkRelation {
    /// Link to the previous page
    Prev,
    /// Link to the next page
    Next,
}

/// A navigation link (`{"rel": "next", "uri": "..."}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub rel: LinkRelation,
    pub uri: String,
}

impl PageLink {
    /// Create a `next` link
    pub fn next(uri: impl Into<String>) -> Self {
        Self {
            rel: LinkRelation::Next,
            uri: uri.into(),
        }
    }

    /// Create a `prev` link
    pub fn prev(uri: impl Into<String>) -> Self {
        Self {
            rel: LinkRelation::Prev,
            uri: uri.into(),
        }
    }
}

/// One page of a server-side paginated collection
///
/// Wire format:
/// ```json
/// { "results": [...], "links": [{"rel": "next", "uri": "..."}], "totalCount": 1337 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items on this page
    pub results: Vec<T>,
    /// Navigation links, if the server sends any
    #[serde(default)]
    pub links: Vec<PageLink>,
    /// Size of the whole collection
    pub total_count: u64,
}

impl<T> PaginatedResponse<T> {
    /// Create a response with no links
    pub fn new(results: Vec<T>, total_count: u64) -> Self {
        Self {
            results,
            links: Vec::new(),
            total_count,
        }
    }

    /// Attach a link
    #[must_use]
    pub fn with_link(mut self, link: PageLink) -> Self {
        self.links.push(link);
        self
    }

    /// Find the URI for a relation
    pub fn link(&self, rel: LinkRelation) -> Option<&str> {
        self.links
            .iter()
            .find(|l| l.rel == rel)
            .map(|l| l.uri.as_str())
    }

    /// Whether the server advertised a next page
    pub fn has_next(&self) -> bool {
        self.link(LinkRelation::Next).is_some()
    }
}
