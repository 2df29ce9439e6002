//! Pager
//!
//! Page navigation model for the product list.

use crate::state::CatalogState;

/// Previous/next availability and the page label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current_page: u32,
    total_pages: u32,
}

impl Pager {
    /// Create a new pager
    pub fn new(current_page: u32, total_pages: u32) -> Self {
        Self {
            current_page,
            total_pages,
        }
    }

    /// Pager for what the catalog currently shows
    pub fn from_state(state: &CatalogState) -> Self {
        Self::new(state.current_page(), state.total_pages())
    }

    pub fn can_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Target of the previous button, if enabled
    pub fn previous(&self) -> Option<u32> {
        self.can_prev().then(|| self.current_page - 1)
    }

    /// Target of the next button, if enabled
    pub fn next(&self) -> Option<u32> {
        self.can_next().then(|| self.current_page + 1)
    }

    /// "Page 2 of 5"; an empty result still reads as one page
    pub fn label(&self) -> String {
        format!("Page {} of {}", self.current_page, self.total_pages.max(1))
    }
}
