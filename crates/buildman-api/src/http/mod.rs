//! HTTP/REST API layer for buildman.
//!
//! Axum-based REST API at `/api/v1/` with envelope responses and CORS
//! support. The browser overlay is its only client.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
