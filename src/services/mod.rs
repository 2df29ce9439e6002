//! Service Layer
//!
//! The service layer abstracts the product REST backend and defines the
//! events the catalog emits to the view.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │                 Catalog                      │
//! │   setters / mutations ──► ProductBackend     │
//! │                              │               │
//! │                        HttpBackend (reqwest) │
//! └──────────────────────────────────────────────┘
//!                     │
//!                     ▼ CatalogEvent
//! ┌──────────────────────────────────────────────┐
//! │                View Layer                    │
//! └──────────────────────────────────────────────┘
//! ```

mod backend;
mod events;
mod http_backend;

pub use backend::*;
pub use events::*;
pub use http_backend::*;
