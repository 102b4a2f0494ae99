use std::sync::RwLock;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::traits::ObjectStore;
use crate::tree::ObjectTree;

/// In-memory object store.
///
/// Intended for tests and embedding. The whole tree lives behind a `RwLock`;
/// values are cloned on read and write. The lock is never held across an
/// `.await`.
pub struct InMemoryObjectStore {
    tree: RwLock<ObjectTree>,
}

impl InMemoryObjectStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tree: RwLock::new(ObjectTree::new()),
        }
    }

    /// Create a store pre-populated with a JSON document.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        Ok(Self {
            tree: RwLock::new(ObjectTree::from_value(value)?),
        })
    }

    /// A copy of the whole tree.
    pub fn snapshot(&self) -> StoreResult<Value> {
        Ok(self.read_tree()?.to_value())
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_tree()?.is_empty())
    }

    /// Remove all objects from the store.
    pub fn clear(&self) -> StoreResult<()> {
        *self.write_tree()? = ObjectTree::new();
        Ok(())
    }

    fn read_tree(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, ObjectTree>> {
        self.tree
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }

    fn write_tree(&self) -> StoreResult<std::sync::RwLockWriteGuard<'_, ObjectTree>> {
        self.tree
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStore for InMemoryObjectStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.read_tree()?.get(key)?.cloned())
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        self.write_tree()?.put(key, value)
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        self.write_tree()?.delete(key)
    }

    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<(String, Value)>> {
        self.read_tree()?.search(collection, query)
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("empty", &self.is_empty().ok())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::Operator;
    use serde_json::json;

    #[tokio::test]
    async fn put_and_get() {
        let store = InMemoryObjectStore::new();
        store.put("files/1", json!({ "nodes": [] })).await.unwrap();
        let value = store.get("files/1").await.unwrap().expect("should exist");
        assert_eq!(value, json!({ "nodes": [] }));
    }

    #[tokio::test]
    async fn get_missing_returns_none() {
        let store = InMemoryObjectStore::new();
        assert!(store.get("files/missing").await.unwrap().is_none());
        assert!(!store.exists("files/missing").await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites() {
        let store = InMemoryObjectStore::new();
        store.put("files/1", json!(1)).await.unwrap();
        store.put("files/1", json!(2)).await.unwrap();
        assert_eq!(store.get("files/1").await.unwrap(), Some(json!(2)));
    }

    #[tokio::test]
    async fn delete_present_and_missing() {
        let store = InMemoryObjectStore::new();
        store.put("files/1", json!(1)).await.unwrap();
        assert!(store.delete("files/1").await.unwrap());
        assert!(!store.exists("files/1").await.unwrap());
        assert!(!store.delete("files/1").await.unwrap());
    }

    #[tokio::test]
    async fn search_by_nested_attribute() {
        let store = InMemoryObjectStore::new();
        store
            .put("pages/1", json!({ "locales": { "en-us": { "permalink": "/about" } } }))
            .await
            .unwrap();
        store
            .put("pages/2", json!({ "locales": { "en-us": { "permalink": "/contact" } } }))
            .await
            .unwrap();

        let query = Query::all().filter("locales/en-us/permalink", Operator::Equals, "/contact");
        let hits = store.search("pages", &query).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, "pages/2");
    }

    #[tokio::test]
    async fn from_value_and_snapshot() {
        let store = InMemoryObjectStore::from_value(json!({ "blocks": { "t": { "content": 1 } } }))
            .unwrap();
        assert_eq!(store.get("blocks/t/content").await.unwrap(), Some(json!(1)));
        assert_eq!(
            store.snapshot().unwrap(),
            json!({ "blocks": { "t": { "content": 1 } } })
        );
    }

    #[tokio::test]
    async fn clear_removes_all() {
        let store = InMemoryObjectStore::new();
        store.put("a/b", json!(true)).await.unwrap();
        assert!(!store.is_empty().unwrap());
        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn poisoned_lock_is_unavailable() {
        let store = InMemoryObjectStore::new();
        store.put("a", json!(1)).await.unwrap();
        std::thread::scope(|s| {
            let writer = s.spawn(|| {
                let _guard = store.tree.write().unwrap();
                panic!("writer died holding the lock");
            });
            assert!(writer.join().is_err());
        });

        assert!(matches!(store.is_empty(), Err(StoreError::Unavailable(_))));
        assert!(matches!(store.get("a").await, Err(StoreError::Unavailable(_))));
        assert!(format!("{store:?}").contains("None"));
    }

    #[tokio::test]
    async fn concurrent_writers_are_safe() {
        use std::sync::Arc;

        let store = Arc::new(InMemoryObjectStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store.put(&format!("files/{i}"), json!(i)).await.unwrap();
                })
            })
            .collect();
        for h in handles {
            h.await.expect("task should not panic");
        }
        let all = store.search("files", &Query::all()).await.unwrap();
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn debug_format() {
        let store = InMemoryObjectStore::new();
        let debug = format!("{store:?}");
        assert!(debug.contains("InMemoryObjectStore"));
    }
}
