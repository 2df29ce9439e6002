//! Utils - Formatting and Logging Setup

pub mod format;
pub mod logging;
