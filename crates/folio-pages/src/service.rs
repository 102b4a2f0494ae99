//! The page service: locale-aware reads over the object store.
//!
//! A [`PageService`] is a stateless orchestrator. It holds no locks and no
//! cache; every call goes to the store. Writes live in [`lifecycle`].
//!
//! Locale arguments follow one rule everywhere: an explicitly passed locale
//! wins, otherwise the registry's current locale is used. Reads fall back to
//! the default locale when the requested one has no entry. In flat mode
//! locale arguments are ignored.

mod lifecycle;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use folio_locale::{normalize_locale_code, LocaleRegistry};
use folio_store::{get_typed, ObjectStore, Operator, Query, StoreError};
use folio_types::{ContentDocument, ContentKey, FlatPageRecord, PageKey, PageRecord, PageView, StoredPage};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::{LocalizationMode, PageServiceConfig};
use crate::error::{PageError, PageResult};
use crate::resolve::{resolve_content_key, resolve_locale};
use crate::template::TemplateSource;

/// Page resolution and lifecycle over an [`ObjectStore`].
pub struct PageService {
    store: Arc<dyn ObjectStore>,
    templates: Arc<dyn TemplateSource>,
    locales: Arc<dyn LocaleRegistry>,
    config: PageServiceConfig,
    mode: LocalizationMode,
}

impl PageService {
    pub fn new(
        store: Arc<dyn ObjectStore>,
        templates: Arc<dyn TemplateSource>,
        locales: Arc<dyn LocaleRegistry>,
        config: PageServiceConfig,
        mode: LocalizationMode,
    ) -> Self {
        Self {
            store,
            templates,
            locales,
            config,
            mode,
        }
    }

    /// Build a service whose mode follows the registry's localization flag.
    pub async fn from_registry(
        store: Arc<dyn ObjectStore>,
        templates: Arc<dyn TemplateSource>,
        locales: Arc<dyn LocaleRegistry>,
        config: PageServiceConfig,
    ) -> PageResult<Self> {
        let mode = LocalizationMode::from_enabled(locales.is_localization_enabled().await?);
        debug!(%mode, "page service mode selected");
        Ok(Self::new(store, templates, locales, config, mode))
    }

    pub fn mode(&self) -> LocalizationMode {
        self.mode
    }

    pub fn config(&self) -> &PageServiceConfig {
        &self.config
    }

    /// Find a page by permalink.
    ///
    /// The requested locale's permalink is searched first, then the default
    /// locale's. The first hit in store order wins.
    pub async fn get_page_by_permalink(
        &self,
        permalink: &str,
        locale: Option<&str>,
    ) -> PageResult<Option<PageView>> {
        if permalink.is_empty() {
            return Err(PageError::missing_parameter("permalink"));
        }

        if self.mode == LocalizationMode::Flat {
            let query = Query::all()
                .filter("permalink", Operator::Equals, permalink)
                .limit(1);
            return match self.search_pages(&query).await?.into_iter().next() {
                Some(page) => Ok(Some(into_flat(page)?.into())),
                None => Ok(None),
            };
        }

        let requested = self.requested_locale(locale).await?;
        let default = self.default_locale().await?;

        let mut matched_under = requested.as_str();
        let mut hits = self
            .search_pages(&self.permalink_query(&requested, permalink))
            .await?;
        if hits.is_empty() && requested != default {
            debug!(permalink, locale = %requested, fallback = %default, "permalink fallback to default locale");
            hits = self
                .search_pages(&self.permalink_query(&default, permalink))
                .await?;
            matched_under = default.as_str();
        }

        let Some(page) = hits.into_iter().next() else {
            return Ok(None);
        };
        let record = into_localized(page)?;
        self.localized_view(&record, matched_under, &default).map(Some)
    }

    /// Fetch a page by key, resolved for `locale`.
    pub async fn get_page_by_key(&self, key: &PageKey, locale: Option<&str>) -> PageResult<PageView> {
        match self.mode {
            LocalizationMode::Flat => Ok(self.load_flat(key).await?.into()),
            LocalizationMode::Localized => {
                let record = self.load_localized(key).await?;
                let requested = self.requested_locale(locale).await?;
                let default = self.default_locale().await?;
                self.localized_view(&record, &requested, &default)
            }
        }
    }

    /// The stored record as is, for callers that edit and then
    /// [`update_page`](Self::update_page).
    pub async fn get_page_record(&self, key: &PageKey) -> PageResult<StoredPage> {
        self.load(key).await
    }

    /// List pages, optionally those whose title contains `pattern`.
    ///
    /// A title match under the default locale also counts when the requested
    /// locale is another one, so untranslated pages are still found. Those
    /// hits follow the requested-locale hits.
    pub async fn search(&self, pattern: Option<&str>, locale: Option<&str>) -> PageResult<Vec<PageView>> {
        let pattern = pattern.filter(|p| !p.is_empty());

        if self.mode == LocalizationMode::Flat {
            let query = match pattern {
                Some(p) => Query::all().filter("title", Operator::Contains, p),
                None => Query::all(),
            };
            return self
                .search_pages(&query)
                .await?
                .into_iter()
                .map(|page| into_flat(page).map(PageView::from))
                .collect();
        }

        let requested = self.requested_locale(locale).await?;
        let default = self.default_locale().await?;

        let pages = match pattern {
            None => self.search_pages(&Query::all()).await?,
            Some(p) => {
                let mut pages = self.search_pages(&self.title_query(&requested, p)).await?;
                if requested != default {
                    let seen: HashSet<PageKey> = pages.iter().map(|page| page.key().clone()).collect();
                    let fallback = self.search_pages(&self.title_query(&default, p)).await?;
                    pages.extend(fallback.into_iter().filter(|page| !seen.contains(page.key())));
                }
                pages
            }
        };

        pages
            .into_iter()
            .map(|page| {
                let record = into_localized(page)?;
                self.localized_view(&record, &requested, &default)
            })
            .collect()
    }

    /// The content document of a page.
    ///
    /// A locale without its own content uses the default locale's content,
    /// independently of which metadata was selected.
    pub async fn get_page_content(&self, key: &PageKey, locale: Option<&str>) -> PageResult<ContentDocument> {
        let content_key = match self.mode {
            LocalizationMode::Flat => self
                .load_flat(key)
                .await?
                .content_key
                .ok_or_else(|| PageError::NotFound(format!("content of page {key}")))?,
            LocalizationMode::Localized => {
                let record = self.load_localized(key).await?;
                let requested = self.requested_locale(locale).await?;
                let default = self.default_locale().await?;
                let resolved = resolve_locale(&record, &requested, &default)?;
                resolve_content_key(&record, &resolved, &default)?.clone()
            }
        };
        self.fetch_content(key, &content_key).await
    }

    /// Locale codes present on a page, in ascending order. Empty for flat
    /// pages.
    pub async fn page_locales(&self, key: &PageKey) -> PageResult<Vec<String>> {
        Ok(match self.load(key).await? {
            StoredPage::Localized(record) => record.locale_codes(),
            StoredPage::Flat(_) => Vec::new(),
        })
    }

    async fn requested_locale(&self, explicit: Option<&str>) -> PageResult<String> {
        match explicit.filter(|code| !code.is_empty()) {
            Some(code) => Ok(normalize_locale_code(code)?),
            None => Ok(self.locales.current_locale().await?),
        }
    }

    async fn default_locale(&self) -> PageResult<String> {
        Ok(self.locales.default_locale().await?)
    }

    async fn load(&self, key: &PageKey) -> PageResult<StoredPage> {
        require_key(key)?;
        get_typed::<StoredPage, _>(self.store.as_ref(), key.as_str())
            .await?
            .ok_or_else(|| PageError::NotFound(format!("page {key}")))
    }

    async fn load_localized(&self, key: &PageKey) -> PageResult<PageRecord> {
        into_localized(self.load(key).await?)
    }

    async fn load_flat(&self, key: &PageKey) -> PageResult<FlatPageRecord> {
        into_flat(self.load(key).await?)
    }

    async fn fetch_content(&self, page: &PageKey, content_key: &ContentKey) -> PageResult<ContentDocument> {
        match self.store.get(content_key.as_str()).await? {
            Some(value) => Ok(ContentDocument::new(value)),
            None => {
                warn!(%page, content = %content_key, "page references a missing content document");
                Err(PageError::NotFound(format!("content {content_key} of page {page}")))
            }
        }
    }

    async fn search_pages(&self, query: &Query) -> PageResult<Vec<StoredPage>> {
        debug!(%query, "searching pages");
        self.store
            .search(&self.config.keys.pages_path, query)
            .await?
            .into_iter()
            .map(|(key, value)| decode_page(key, value))
            .collect()
    }

    fn permalink_query(&self, locale: &str, permalink: &str) -> Query {
        Query::all()
            .filter(
                self.config.keys.locale_field(locale, "permalink"),
                Operator::Equals,
                permalink,
            )
            .limit(1)
    }

    fn title_query(&self, locale: &str, pattern: &str) -> Query {
        Query::all().filter(
            self.config.keys.locale_field(locale, "title"),
            Operator::Contains,
            pattern,
        )
    }

    fn localized_view(&self, record: &PageRecord, requested: &str, default: &str) -> PageResult<PageView> {
        let resolved = resolve_locale(record, requested, default)?;
        if resolved.fell_back {
            debug!(page = %record.key, locale = requested, fallback = default, "metadata fallback to default locale");
        }
        Ok(resolved.to_view(record))
    }
}

impl fmt::Debug for PageService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageService")
            .field("mode", &self.mode)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn require_key(key: &PageKey) -> PageResult<()> {
    if key.as_str().is_empty() {
        return Err(PageError::missing_parameter("key"));
    }
    Ok(())
}

fn decode_page(key: String, value: Value) -> PageResult<StoredPage> {
    serde_json::from_value(value).map_err(|e| {
        StoreError::CorruptObject {
            key,
            reason: e.to_string(),
        }
        .into()
    })
}

fn encode<T: Serialize>(value: &T) -> PageResult<Value> {
    serde_json::to_value(value).map_err(|e| StoreError::Serialization(e.to_string()).into())
}

fn into_localized(page: StoredPage) -> PageResult<PageRecord> {
    match page {
        StoredPage::Localized(record) => Ok(record),
        StoredPage::Flat(record) => Err(PageError::inconsistent(
            record.key.as_str(),
            "expected a localized page record, found a flat one",
        )),
    }
}

fn into_flat(page: StoredPage) -> PageResult<FlatPageRecord> {
    match page {
        StoredPage::Flat(record) => Ok(record),
        StoredPage::Localized(record) => Err(PageError::inconsistent(
            record.key.as_str(),
            "expected a flat page record, found a localized one",
        )),
    }
}
