//! Client-side pagination over an in-memory collection

use super::types::PageNavigator;
use tracing::debug;

/// Page size used when none is given
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Paginates a collection that is already fully loaded
///
/// A page size of zero degrades to a single page holding the whole
/// collection. The stored page index survives changes to the items or the
/// page size and is clamped into range on every read.
#[derive(Debug, Clone)]
pub struct ClientPaginator<T> {
    items: Vec<T>,
    page_size: usize,
    page: u32,
}

impl<T> ClientPaginator<T> {
    /// Paginate `items` ten at a time
    pub fn new(items: Vec<T>) -> Self {
        Self::with_page_size(items, DEFAULT_PAGE_SIZE)
    }

    /// Paginate `items` with a custom page size
    pub fn with_page_size(items: Vec<T>, page_size: usize) -> Self {
        Self {
            items,
            page_size,
            page: 1,
        }
    }

    /// The whole collection
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Configured page size
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Replace the collection
    pub fn set_items(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Change the page size
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size;
    }

    /// Items on the current page
    pub fn current_items(&self) -> &[T] {
        if self.page_size == 0 {
            return &self.items;
        }

        let page = self.current_page() as usize;
        let lower = (page - 1).saturating_mul(self.page_size);
        let upper = page.saturating_mul(self.page_size).min(self.items.len());

        self.items.get(lower..upper).unwrap_or(&[])
    }

    /// Consume the paginator, returning the collection
    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T> PageNavigator for ClientPaginator<T> {
    fn current_page(&self) -> u32 {
        let total = self.total_pages().unwrap_or(1);
        self.page.clamp(1, total)
    }

    fn total_pages(&self) -> Option<u32> {
        if self.page_size == 0 {
            return Some(1);
        }
        let pages = self.items.len().div_ceil(self.page_size).max(1);
        Some(u32::try_from(pages).unwrap_or(u32::MAX))
    }

    fn paginated(&self) -> bool {
        // Zero page size is always a single page
        self.page_size > 0 && self.items.len() > self.page_size
    }

    fn go_to(&mut self, page: i64) -> bool {
        let total = i64::from(self.total_pages().unwrap_or(1));
        let target = page.clamp(1, total) as u32;
        let changed = target != self.current_page();

        self.page = target;
        if changed {
            debug!("Client paginator moved to page {}/{}", target, total);
        }
        changed
    }
}
