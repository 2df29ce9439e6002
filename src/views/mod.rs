//! Views - Presentation Over the Catalog Store

pub mod console;
pub mod pager;

pub use console::ConsoleView;
pub use pager::Pager;
