//! Seed content for new pages.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use folio_store::{ObjectStore, StoreError};
use folio_types::ContentDocument;
use serde_json::Value;

/// Errors from template lookups.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("template not found: {0}")]
    NotFound(String),

    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Supplies the document every new page starts from.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    async fn template_content(&self, key: &str) -> Result<ContentDocument, TemplateError>;
}

/// Templates read from the object store.
///
/// A stored block of the form `{ "content": ... }` yields its `content`;
/// any other value is used verbatim.
pub struct StoreTemplateSource {
    store: Arc<dyn ObjectStore>,
}

impl StoreTemplateSource {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl TemplateSource for StoreTemplateSource {
    async fn template_content(&self, key: &str) -> Result<ContentDocument, TemplateError> {
        match self.store.get(key).await? {
            None => Err(TemplateError::NotFound(key.to_string())),
            Some(Value::Object(mut block)) if block.contains_key("content") => {
                Ok(ContentDocument::new(block.remove("content").unwrap_or(Value::Null)))
            }
            Some(value) => Ok(ContentDocument::new(value)),
        }
    }
}

/// A fixed set of templates held in memory.
#[derive(Clone, Debug, Default)]
pub struct StaticTemplateSource {
    templates: HashMap<String, ContentDocument>,
}

impl StaticTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, key: impl Into<String>, document: ContentDocument) -> Self {
        self.templates.insert(key.into(), document);
        self
    }
}

#[async_trait]
impl TemplateSource for StaticTemplateSource {
    async fn template_content(&self, key: &str) -> Result<ContentDocument, TemplateError> {
        self.templates
            .get(key)
            .cloned()
            .ok_or_else(|| TemplateError::NotFound(key.to_string()))
    }
}
