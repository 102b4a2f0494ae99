//! Test fixtures: a store with injectable failures and a ready service.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use folio_store::{InMemoryObjectStore, ObjectStore, Query, StoreError, StoreResult};
use folio_locale::InMemoryLocaleRegistry;
use folio_types::ContentDocument;
use serde_json::{json, Value};

use crate::config::{LocalizationMode, PageServiceConfig};
use crate::service::PageService;
use crate::template::StaticTemplateSource;

/// An in-memory store whose puts or deletes fail for keys under a prefix.
#[derive(Debug, Default)]
pub(crate) struct FaultyStore {
    inner: InMemoryObjectStore,
    failing_puts: RwLock<Option<String>>,
    failing_deletes: RwLock<Option<String>>,
}

impl FaultyStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn fail_puts_under(&self, prefix: &str) {
        *self.failing_puts.write().unwrap() = Some(prefix.to_string());
    }

    pub(crate) fn fail_deletes_under(&self, prefix: &str) {
        *self.failing_deletes.write().unwrap() = Some(prefix.to_string());
    }

    pub(crate) fn heal(&self) {
        *self.failing_puts.write().unwrap() = None;
        *self.failing_deletes.write().unwrap() = None;
    }

    fn check(rule: &RwLock<Option<String>>, key: &str) -> StoreResult<()> {
        match rule.read().unwrap().as_deref() {
            Some(prefix) if key == prefix || key.starts_with(&format!("{prefix}/")) => {
                Err(StoreError::Unavailable(format!("injected failure at {key}")))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Value>> {
        self.inner.get(key).await
    }

    async fn put(&self, key: &str, value: Value) -> StoreResult<()> {
        Self::check(&self.failing_puts, key)?;
        self.inner.put(key, value).await
    }

    async fn delete(&self, key: &str) -> StoreResult<bool> {
        Self::check(&self.failing_deletes, key)?;
        self.inner.delete(key).await
    }

    async fn search(&self, collection: &str, query: &Query) -> StoreResult<Vec<(String, Value)>> {
        self.inner.search(collection, query).await
    }
}

pub(crate) const TEMPLATE_KEY: &str = "blocks/new-page-template";

pub(crate) fn template() -> ContentDocument {
    ContentDocument::new(json!({ "nodes": [{ "type": "section", "children": [] }] }))
}

/// A service over a [`FaultyStore`] with `en-us` (default), `fr-fr` and
/// `ru-ru` installed.
pub(crate) struct Fixture {
    pub(crate) service: PageService,
    pub(crate) store: Arc<FaultyStore>,
    pub(crate) locales: Arc<InMemoryLocaleRegistry>,
}

pub(crate) fn fixture(mode: LocalizationMode) -> Fixture {
    let store = Arc::new(FaultyStore::new());
    let locales = Arc::new(InMemoryLocaleRegistry::new());
    locales.create_locale("fr-fr", "Français").unwrap();
    locales.create_locale("ru-ru", "Русский").unwrap();
    let templates = Arc::new(StaticTemplateSource::new().with_template(TEMPLATE_KEY, template()));
    let service = PageService::new(
        store.clone(),
        templates,
        locales.clone(),
        PageServiceConfig::default(),
        mode,
    );
    Fixture {
        service,
        store,
        locales,
    }
}
