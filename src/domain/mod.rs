//! Domain - Pure Data Structures and Protocol Types
//!
//! These types don't depend on the runtime or the backend and represent the
//! catalog domain.

pub mod config;
pub mod form;
pub mod product;
pub mod query;
