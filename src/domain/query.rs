//! Query - What the Catalog Is Currently Showing

use crate::constants::{DEFAULT_PAGE_SIZE, FIRST_PAGE};

/// The (page number, page size, search term) tuple driving every fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page_number: u32,
    pub page_size: u32,
    pub search_term: String,
}

impl QueryState {
    /// First page of the unfiltered listing
    pub fn new(page_size: u32) -> Self {
        Self {
            page_number: FIRST_PAGE,
            page_size: page_size.max(1),
            search_term: String::new(),
        }
    }

    /// Whether this query goes to the search endpoint
    pub fn is_search(&self) -> bool {
        !self.search_term.is_empty()
    }

    /// The backend operation this query maps to
    pub fn request(&self) -> ProductRequest {
        if self.is_search() {
            ProductRequest::Search {
                name: self.search_term.clone(),
                page_size: self.page_size,
                page_number: self.page_number,
            }
        } else {
            ProductRequest::List {
                page_size: self.page_size,
                page_number: self.page_number,
            }
        }
    }
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// A read request against the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductRequest {
    /// Unfiltered listing
    List { page_size: u32, page_number: u32 },
    /// Name search
    Search {
        name: String,
        page_size: u32,
        page_number: u32,
    },
}

impl ProductRequest {
    pub fn page_number(&self) -> u32 {
        match self {
            ProductRequest::List { page_number, .. }
            | ProductRequest::Search { page_number, .. } => *page_number,
        }
    }

    pub fn page_size(&self) -> u32 {
        match self {
            ProductRequest::List { page_size, .. } | ProductRequest::Search { page_size, .. } => {
                *page_size
            }
        }
    }
}
