use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The stored body of a page.
///
/// Folio treats content as an opaque JSON tree: it is seeded from a template,
/// moved between keys and overwritten, but never interpreted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDocument(Value);

impl ContentDocument {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty document with a single empty node list.
    pub fn empty() -> Self {
        Self(serde_json::json!({ "nodes": [] }))
    }

    /// `true` when the document carries no value at all (JSON `null`).
    pub fn is_unspecified(&self) -> bool {
        self.0.is_null()
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }
}

impl From<Value> for ContentDocument {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
