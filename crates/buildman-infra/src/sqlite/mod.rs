//! SQLite storage layer.
//!
//! The key-value store behind the build list and active selection, backed
//! by SQLite with WAL mode and split read/write connection pools.

pub mod kv;
pub mod pool;
