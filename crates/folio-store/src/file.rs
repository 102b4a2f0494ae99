//! JSON-file-backed object store.
//!
//! The whole tree is loaded at open and rewritten after every mutation. A
//! write goes to a temporary file in the same directory which is then
//! renamed over the target, so a crash leaves either the old or the new
//! document on disk, never a torn one. The rewrite runs on the blocking
//! thread pool so async callers are not stalled by file I/O.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::query::Query;
use crate::traits::ObjectStore;
use crate::tree::ObjectTree;

/// Object store persisted as a single JSON document.
///
/// Mutations serialize and rewrite the file on tokio's blocking pool; reads
/// are served from the loaded tree.
pub struct JsonFileObjectStore {
    inner: Arc<FileState>,
}

struct FileState {
    path: PathBuf,
    tree: RwLock<ObjectTree>,
}

impl JsonFileObjectStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// is created on the first write.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tree = if path.exists() {
            let bytes = std::fs::read(&path)?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                ObjectTree::new()
            } else {
                let value: Value = serde_json::from_slice(&bytes)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                ObjectTree::from_value(value)?
            }
        } else {
            ObjectTree::new()
        };
        debug!(path = %path.display(), "opened json object store");
        Ok(Self {
            inner: Arc::new(FileState {
                path,
                tree: RwLock::new(tree),
            }),
        })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    async fn mutate<T, F>(&self, op: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut ObjectTree) -> StoreResult<T> + Send + 'static,
    {
        let inner = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || inner.mutate(op))
            .await
            .map_err(|e| StoreError::Unavailable(format!("store write task failed: {e}")))?
    }
}

impl FileState {
    /// Apply `op` to a copy of the tree, persist the copy, then publish it.
    /// A failed persist leaves both the file and the in-memory tree as they
    /// were.
    fn mutate<T>(&self, op: impl FnOnce(&mut ObjectTree) -> StoreResult<T>) -> StoreResult<T> {
        let mut tree = self
            .tree
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        let mut next = tree.clone();
        let result = op(&mut next)?;
        self.persist(&next)?;
        *tree = next;
        Ok(result)
    }

    fn persist(&self, tree: &ObjectTree) -> StoreResult<()> {
        let bytes = serde_json::to_vec_pretty(&tree.to_value())
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }

    fn read_tree(&self) -> StoreResult<std::sync::RwLockReadGuard<'_, ObjectTree>> {
        self.tree
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))
    }
}

#[async_trait]
impl ObjectStore for JsonFileObjectStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        Ok(self.inner.read_tree()?.get(key)?.cloned())
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        let key = key.to_string();
        self.mutate(move |tree| tree.put(&key, value)).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        let key = key.to_string();
        self.mutate(move |tree| tree.delete(&key)).await
    }

    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<(String, Value)>> {
        self.inner.read_tree()?.search(collection, query)
    }
}

impl std::fmt::Debug for JsonFileObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonFileObjectStore")
            .field("path", &self.inner.path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileObjectStore::open(dir.path().join("store.json")).unwrap();
        assert!(store.get("pages/1").await.unwrap().is_none());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileObjectStore::open(&path).unwrap();
        store.put("pages/1", json!({ "key": "pages/1" })).await.unwrap();
        store.put("files/1", json!({ "nodes": [] })).await.unwrap();
        assert!(store.delete("files/1").await.unwrap());
        drop(store);

        let reopened = JsonFileObjectStore::open(&path).unwrap();
        assert_eq!(
            reopened.get("pages/1").await.unwrap(),
            Some(json!({ "key": "pages/1" }))
        );
        assert!(reopened.get("files/1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/store.json");
        let store = JsonFileObjectStore::open(&path).unwrap();
        store.put("a", json!(1)).await.unwrap();
        assert!(path.exists());
    }

    #[tokio::test]
    async fn failed_write_leaves_tree_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileObjectStore::open(dir.path().join("store.json")).unwrap();
        store.put("pages/1", json!("scalar")).await.unwrap();

        let err = store.put("pages/1/locales", json!({})).await.unwrap_err();
        assert!(matches!(err, StoreError::PathConflict { .. }));
        assert_eq!(store.get("pages/1").await.unwrap(), Some(json!("scalar")));
    }

    #[tokio::test]
    async fn search_reads_from_loaded_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, r#"{ "pages": { "a": { "title": "A" }, "b": { "title": "B" } } }"#)
            .unwrap();

        let store = JsonFileObjectStore::open(&path).unwrap();
        let hits = store.search("pages", &Query::all()).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_all_persist() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(JsonFileObjectStore::open(&path).unwrap());

        let mut writes = tokio::task::JoinSet::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            writes.spawn(async move { store.put(&format!("pages/{i}"), json!({ "n": i })).await });
        }
        while let Some(result) = writes.join_next().await {
            result.unwrap().unwrap();
        }
        drop(store);

        let reopened = JsonFileObjectStore::open(&path).unwrap();
        let hits = reopened.search("pages", &Query::all()).await.unwrap();
        assert_eq!(hits.len(), 16);
    }

    #[test]
    fn corrupt_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        assert!(matches!(
            JsonFileObjectStore::open(&path).unwrap_err(),
            StoreError::CorruptObject { .. }
        ));

        std::fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            JsonFileObjectStore::open(&path).unwrap_err(),
            StoreError::Serialization(_)
        ));
    }
}
