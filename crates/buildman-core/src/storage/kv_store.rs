//! Key-value store trait.
//!
//! Defines the interface for the JSON key-value persistence the build
//! manager keeps its state in. Implementations live in buildman-infra.

use buildman_types::error::RepositoryError;

/// Trait for key-value persistent storage of JSON documents.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait KvStore: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;
}
