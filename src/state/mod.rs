//! State - Catalog Store
//!
//! Follows a unidirectional data flow pattern:
//!
//! ```text
//! View Action → Catalog setter/mutation → Backend call → Store update → CatalogEvent → View refresh
//! ```

pub mod catalog;
pub mod catalog_state;

pub use catalog::Catalog;
pub use catalog_state::CatalogState;
