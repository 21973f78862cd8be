//! REST API request handlers.

pub mod build;
pub mod current;
