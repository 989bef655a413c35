//! Pagination types and traits
//!
//! Defines the navigation contract shared by the client-side and
//! server-side paginators, plus the bookkeeping types of the server fetch
//! cycle.

/// Navigation contract shared by every paginator
///
/// Pages are 1-based. Targets are signed so callers can pass values below 1;
/// each implementation decides whether out-of-range targets are clamped or
/// ignored.
pub trait PageNavigator {
    /// Current 1-based page
    fn current_page(&self) -> u32;

    /// Number of pages, or `None` while it is not known yet
    fn total_pages(&self) -> Option<u32>;

    /// Whether there is more than one page worth of data
    fn paginated(&self) -> bool;

    /// Move to `page`; returns whether the current page changed
    fn go_to(&mut self, page: i64) -> bool;

    /// Move forward one page
    fn go_to_next(&mut self) -> bool {
        self.go_to(i64::from(self.current_page()) + 1)
    }

    /// Move back one page
    fn go_to_previous(&mut self) -> bool {
        self.go_to(i64::from(self.current_page()) - 1)
    }

    /// Whether a page follows the current one
    fn show_next_button(&self) -> bool {
        self.total_pages()
            .is_some_and(|total| self.current_page() < total)
    }

    /// Whether a page precedes the current one
    fn show_previous_button(&self) -> bool {
        self.current_page() > 1
    }
}

/// Lifecycle of a server paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    /// No successful response yet; the collection size is unknown
    Uninitialized,
    /// Collection size known from the latest applied response
    Ready,
}

/// Last-known-good values from the newest applied successful response
///
/// Issuing a request or receiving a failure never clears these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StickyTotals {
    /// Collection size reported by the server
    pub total_count: Option<u64>,
    /// Number of items on the last received page
    pub current_page_size: Option<usize>,
}

/// A fetch issued by a server paginator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Monotonically increasing per paginator
    pub seq: u64,
    /// Page the request was issued for
    pub page: u32,
    /// Request key sent to the fetcher
    pub key: String,
}

/// Outcome of handing a finished request back to the paginator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// Response stored and sticky totals updated
    Success,
    /// Error recorded, state otherwise untouched
    Failure,
    /// Older than the latest applied response; ignored
    Discarded,
}
