use async_trait::async_trait;
use serde_json::Value;

use crate::error::StoreResult;
use crate::query::Query;

/// Hierarchical key/value object store.
///
/// All implementations must satisfy these invariants:
/// - Keys are `/`-separated paths; a key may address a nested node inside a
///   larger object (`pages/x/locales/fr-fr`).
/// - `put` is last-writer-wins. There are no multi-key transactions.
/// - `search` returns results in a stable store order (ascending key).
/// - The store never interprets object contents beyond query evaluation.
/// - All I/O errors are propagated, never silently ignored.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read the object at `key`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    async fn get(&self, key: &str) -> StoreResult<Option<Value>>;

    /// Create or overwrite the object at `key`.
    async fn put(&self, key: &str, value: Value) -> StoreResult<()>;

    /// Delete the object at `key`. Returns `true` if it existed.
    async fn delete(&self, key: &str) -> StoreResult<bool>;

    /// Search the direct children of `collection` with `query`.
    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<(String, Value)>>;

    /// Check whether an object exists at `key`.
    ///
    /// Default implementation calls `get()`. Backends may override to avoid
    /// materializing the value.
    async fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
