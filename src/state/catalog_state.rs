//! CatalogState - Current Page, Flags and Query

use std::sync::Arc;

use crate::domain::product::{Page, Product};
use crate::domain::query::QueryState;

/// Everything the view renders
///
/// Handed out as a cloned snapshot, so a reader always sees one consistent
/// page.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogState {
    products: Vec<Product>,
    loading: bool,
    error: Option<Arc<str>>,
    total_pages: u32,
    pub(crate) query: QueryState,
}

impl CatalogState {
    /// Empty state before the first fetch
    pub fn new(page_size: u32) -> Self {
        Self {
            products: Vec::new(),
            loading: false,
            error: None,
            total_pages: 1,
            query: QueryState::new(page_size),
        }
    }

    // ==================== Getters ====================

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn current_page(&self) -> u32 {
        self.query.page_number
    }

    pub fn total_pages(&self) -> u32 {
        self.total_pages
    }

    pub fn page_size(&self) -> u32 {
        self.query.page_size
    }

    pub fn search_term(&self) -> &str {
        &self.query.search_term
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    // ==================== Updates ====================

    /// Replace the page wholesale
    pub(crate) fn apply_page(&mut self, page: Page) {
        self.products = page.items;
        self.total_pages = page.total_pages;
        self.error = None;
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    pub(crate) fn set_error(&mut self, message: Arc<str>) {
        self.error = Some(message);
    }

    pub(crate) fn clear_error(&mut self) {
        self.error = None;
    }
}
