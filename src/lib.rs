//! Product Catalog Client Library
//!
//! Paged listing, name search and CRUD for a product catalog served by a
//! REST backend. [`state::Catalog`] owns the store and keeps it in sync with
//! the backend; the view layer reads snapshots and subscribes to
//! [`services::CatalogEvent`]s.

pub mod constants;
pub mod domain;
pub mod error;
pub mod helpers;
pub mod services;
pub mod state;
pub mod utils;
pub mod views;
