//! Storage abstractions for buildman.
//!
//! Defines the key-value store trait plus the read helpers that normalize
//! whatever is stored under a key into the shape the caller expects.
//! Persistent implementations live in buildman-infra.

pub mod kv_store;
pub mod memory;

use serde::de::DeserializeOwned;

use buildman_types::error::RepositoryError;

use self::kv_store::KvStore;

/// Read a JSON array stored under `key`.
///
/// A missing key or a non-array value reads as an empty list. Elements that
/// do not deserialize into `T` are skipped with a warning.
pub async fn read_array<S, T>(store: &S, key: &str) -> Result<Vec<T>, RepositoryError>
where
    S: KvStore,
    T: DeserializeOwned,
{
    let items = match store.get(key).await? {
        Some(serde_json::Value::Array(items)) => items,
        Some(other) => {
            tracing::warn!(key, kind = json_kind(&other), "expected array in store, ignoring");
            return Ok(Vec::new());
        }
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value(item) {
            Ok(value) => out.push(value),
            Err(err) => tracing::warn!(key, index, "skipping unreadable entry: {err}"),
        }
    }
    Ok(out)
}

/// Read a single JSON value stored under `key`.
///
/// A missing key, an explicit `null`, or an unreadable value all read as `None`.
pub async fn read_value<S, T>(store: &S, key: &str) -> Result<Option<T>, RepositoryError>
where
    S: KvStore,
    T: DeserializeOwned,
{
    match store.get(key).await? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(value) => match serde_json::from_value(value) {
            Ok(parsed) => Ok(Some(parsed)),
            Err(err) => {
                tracing::warn!(key, "ignoring unreadable value: {err}");
                Ok(None)
            }
        },
    }
}

/// Serialize `value` and store it under `key`.
pub async fn write_value<S, T>(store: &S, key: &str, value: &T) -> Result<(), RepositoryError>
where
    S: KvStore,
    T: serde::Serialize + ?Sized,
{
    let json = serde_json::to_value(value)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    store.set(key, &json).await
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory::InMemoryKvStore;

    #[tokio::test]
    async fn test_read_array_normalizes_non_arrays() {
        let store = InMemoryKvStore::new();
        let empty: Vec<u32> = read_array(&store, "k").await.unwrap();
        assert!(empty.is_empty());

        store.set("k", &serde_json::json!({"not": "array"})).await.unwrap();
        let empty: Vec<u32> = read_array(&store, "k").await.unwrap();
        assert!(empty.is_empty());
    }

    #[tokio::test]
    async fn test_read_array_skips_bad_elements() {
        let store = InMemoryKvStore::new();
        store.set("k", &serde_json::json!([1, "two", 3])).await.unwrap();
        let items: Vec<u32> = read_array(&store, "k").await.unwrap();
        assert_eq!(items, vec![1, 3]);
    }

    #[tokio::test]
    async fn test_read_value_null_is_none() {
        let store = InMemoryKvStore::new();
        store.set("k", &serde_json::Value::Null).await.unwrap();
        let value: Option<u32> = read_value(&store, "k").await.unwrap();
        assert!(value.is_none());

        write_value(&store, "k", &7u32).await.unwrap();
        let value: Option<u32> = read_value(&store, "k").await.unwrap();
        assert_eq!(value, Some(7));
    }
}
