//! Catalog Events
//!
//! Change notifications emitted by the catalog to its subscribers (the view
//! layer). Subscribers re-read a snapshot on receipt; events carry just enough
//! to decide whether a redraw is needed.

use std::sync::Arc;

use crate::domain::query::QueryState;

/// Events emitted by the catalog
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogEvent {
    /// Query State changed through a setter or a page reset
    QueryChanged(QueryState),

    /// Loading flag flipped
    LoadingChanged {
        /// Whether the fetch for the current query is in flight
        loading: bool,
    },

    /// A fetch result was applied to the store
    PageLoaded {
        /// Page the items belong to
        page_number: u32,
        /// Number of items on the page
        item_count: usize,
        /// Total pages reported by the backend
        total_pages: u32,
    },

    /// A fetch or mutation failed and the store error was set
    ErrorOccurred {
        /// Human-readable message stored in the catalog
        message: Arc<str>,
    },
}
