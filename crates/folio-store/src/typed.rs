//! Typed access on top of [`ObjectStore`].
//!
//! Decoding happens at the store boundary: a value whose shape does not
//! match `T` is reported as [`StoreError::CorruptObject`] naming the key.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{StoreError, StoreResult};
use crate::traits::ObjectStore;

/// Read and decode the object at `key`.
pub async fn get_typed<T, S>(store: &S, key: &str) -> StoreResult<Option<T>>
where
    T: DeserializeOwned,
    S: ObjectStore + ?Sized,
{
    match store.get(key).await? {
        None => Ok(None),
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| StoreError::CorruptObject {
                key: key.to_string(),
                reason: e.to_string(),
            }),
    }
}

/// Encode `value` and write it at `key`.
pub async fn put_typed<T, S>(store: &S, key: &str, value: &T) -> StoreResult<()>
where
    T: Serialize + ?Sized,
    S: ObjectStore + ?Sized,
{
    let encoded =
        serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.put(key, encoded).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryObjectStore;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Block {
        title: String,
    }

    #[tokio::test]
    async fn typed_roundtrip() {
        let store = InMemoryObjectStore::new();
        let block = Block { title: "Hero".into() };
        put_typed(&store, "blocks/hero", &block).await.unwrap();
        let read: Option<Block> = get_typed(&store, "blocks/hero").await.unwrap();
        assert_eq!(read, Some(block));
    }

    #[tokio::test]
    async fn missing_is_none() {
        let store = InMemoryObjectStore::new();
        let read: Option<Block> = get_typed(&store, "blocks/none").await.unwrap();
        assert!(read.is_none());
    }

    #[tokio::test]
    async fn shape_mismatch_is_corrupt_object() {
        let store = InMemoryObjectStore::new();
        store
            .put("blocks/bad", json!({ "title": "x", "extra": 1 }))
            .await
            .unwrap();
        let err = get_typed::<Block, _>(&store, "blocks/bad").await.unwrap_err();
        match err {
            StoreError::CorruptObject { key, .. } => assert_eq!(key, "blocks/bad"),
            other => panic!("expected CorruptObject, got {other}"),
        }
    }

    #[tokio::test]
    async fn works_through_trait_objects() {
        let store: Box<dyn ObjectStore> = Box::new(InMemoryObjectStore::new());
        put_typed(store.as_ref(), "blocks/a", &Block { title: "A".into() })
            .await
            .unwrap();
        let read: Option<Block> = get_typed(store.as_ref(), "blocks/a").await.unwrap();
        assert_eq!(read.unwrap().title, "A");
    }
}
