use std::fmt;

use serde::{Deserialize, Serialize};

use crate::page::LOCALE_PREFIX;

/// Storage key of a page record (e.g. `pages/0190...`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageKey(String);

impl PageKey {
    /// Wrap an existing storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw storage path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageKey({})", self.0)
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PageKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Storage key of a content document (e.g. `files/0190...`).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentKey(String);

impl ContentKey {
    /// Wrap an existing storage key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// The raw storage path.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentKey({})", self.0)
    }
}

impl fmt::Display for ContentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

/// Key derivation rules for page storage.
///
/// Page keys live under `pages_path`, content documents under
/// `documents_path`. Every allocation draws a fresh UUID v7, so keys are
/// never reused even after the object they named is deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KeyLayout {
    /// Collection holding page records.
    pub pages_path: String,
    /// Collection holding content documents.
    pub documents_path: String,
}

impl Default for KeyLayout {
    fn default() -> Self {
        Self {
            pages_path: "pages".into(),
            documents_path: "files".into(),
        }
    }
}

impl KeyLayout {
    /// Allocate a fresh page key.
    pub fn new_page_key(&self) -> PageKey {
        PageKey(format!("{}/{}", self.pages_path, uuid::Uuid::now_v7()))
    }

    /// Allocate a fresh content key.
    pub fn new_content_key(&self) -> ContentKey {
        ContentKey(format!("{}/{}", self.documents_path, uuid::Uuid::now_v7()))
    }

    /// Storage path of one locale's metadata node inside a page record.
    pub fn locale_node(&self, page: &PageKey, locale: &str) -> String {
        format!("{}/{LOCALE_PREFIX}/{locale}", page.as_str())
    }

    /// Attribute path of a locale-scoped field, relative to a page record.
    pub fn locale_field(&self, locale: &str, field: &str) -> String {
        format!("{LOCALE_PREFIX}/{locale}/{field}")
    }
}
