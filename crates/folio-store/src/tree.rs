//! The hierarchical JSON tree shared by every store backend.
//!
//! A key such as `pages/abc/locales/fr-fr` addresses a node by walking
//! object members from the root. Writes create intermediate objects, deletes
//! may remove any nested node, and searches test the direct children of a
//! collection node.

use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};
use crate::keys::split_key;
use crate::query::Query;

/// Path-addressed JSON object tree.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectTree {
    root: Map<String, Value>,
}

impl ObjectTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing JSON document as the tree root.
    ///
    /// The root must be a JSON object.
    pub fn from_value(value: Value) -> StoreResult<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(StoreError::CorruptObject {
                key: String::new(),
                reason: format!("tree root must be an object, found {}", kind_of(&other)),
            }),
        }
    }

    /// The whole tree as a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.root.clone())
    }

    /// `true` if the root holds no members.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Read the node at `key`, if present.
    pub fn get(&self, key: &str) -> StoreResult<Option<&Value>> {
        let segments = split_key(key)?;
        let Some((first, rest)) = segments.split_first() else {
            return Ok(None);
        };
        let mut node = match self.root.get(*first) {
            Some(node) => node,
            None => return Ok(None),
        };
        for segment in rest {
            node = match node.as_object().and_then(|o| o.get(*segment)) {
                Some(child) => child,
                None => return Ok(None),
            };
        }
        Ok(Some(node))
    }

    /// Write `value` at `key`, creating intermediate objects.
    ///
    /// Fails with [`StoreError::PathConflict`] if an intermediate node
    /// exists but is not an object.
    pub fn put(&mut self, key: &str, value: Value) -> StoreResult<()> {
        let segments = split_key(key)?;
        let Some((last, parents)) = segments.split_last() else {
            return Err(StoreError::invalid_key(key, "key must not be empty"));
        };
        let mut current = &mut self.root;
        for segment in parents {
            let child = current
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match child {
                Value::Object(map) => map,
                _ => {
                    return Err(StoreError::PathConflict {
                        key: key.to_string(),
                        segment: segment.to_string(),
                    })
                }
            };
        }
        current.insert(last.to_string(), value);
        Ok(())
    }

    /// Remove the node at `key`. Returns `true` if it existed.
    pub fn delete(&mut self, key: &str) -> StoreResult<bool> {
        let segments = split_key(key)?;
        let Some((last, parents)) = segments.split_last() else {
            return Ok(false);
        };
        let mut current = &mut self.root;
        for segment in parents {
            current = match current.get_mut(*segment) {
                Some(Value::Object(map)) => map,
                _ => return Ok(false),
            };
        }
        Ok(current.remove(*last).is_some())
    }

    /// Direct children of `collection` that satisfy `query`, as
    /// `(full key, value)` pairs in ascending child-key order.
    ///
    /// A missing collection yields no results.
    pub fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<(String, Value)>> {
        let children = match self.get(collection)? {
            None => return Ok(Vec::new()),
            Some(Value::Object(children)) => children,
            Some(other) => {
                return Err(StoreError::CorruptObject {
                    key: collection.to_string(),
                    reason: format!("collection must be an object, found {}", kind_of(other)),
                })
            }
        };

        let mut results: Vec<(String, Value)> = children
            .iter()
            .filter(|(_, value)| query.matches(value))
            .map(|(name, value)| (format!("{collection}/{name}"), value.clone()))
            .collect();
        results.sort_by(|(a, _), (b, _)| a.cmp(b));
        if let Some(limit) = query.max_results() {
            results.truncate(limit);
        }
        Ok(results)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
