//! Infrastructure layer for buildman.
//!
//! Contains implementations of the port traits defined in `buildman-core`:
//! the SQLite key-value store, the reqwest game client, plus configuration
//! loading and data directory layout.

pub mod config;
pub mod filesystem;
pub mod http;
pub mod sqlite;
