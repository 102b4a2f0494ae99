//! Page writes: create, update, content authoring, and deletion.
//!
//! Writes that touch more than one key run as a [`WriteSequence`] so a
//! failure part way through is either undone or reported as
//! [`PageError::InconsistentState`].

use std::sync::Arc;

use folio_locale::LocaleError;
use folio_store::{put_typed, StoreError, StoreResult};
use folio_types::{ContentDocument, ContentKey, FlatPageRecord, LocaleMetadata, PageKey, PageRecord, PageView, StoredPage};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::{encode, require_key, PageService};
use crate::config::LocalizationMode;
use crate::error::{PageError, PageResult};
use crate::resolve::fallback_locale;
use crate::sequence::{StoreOp, WriteSequence};

impl PageService {
    /// Create a page in the current locale, seeded from the new-page
    /// template.
    pub async fn create_page(
        &self,
        permalink: &str,
        title: &str,
        description: &str,
        keywords: &str,
    ) -> PageResult<PageView> {
        if permalink.is_empty() {
            return Err(PageError::missing_parameter("permalink"));
        }

        let template = self
            .templates
            .template_content(&self.config.template_key)
            .await?;

        let page_key = self.config.keys.new_page_key();
        let content_key = self.config.keys.new_content_key();
        debug!(page = %page_key, content = %content_key, "keys allocated");

        let metadata = LocaleMetadata::new(title, description, keywords, permalink)
            .with_content_key(content_key.clone());
        let (stored, view) = match self.mode {
            LocalizationMode::Localized => {
                let locale = self.locales.current_locale().await?;
                let view = PageView::localized(page_key.clone(), &locale, &metadata);
                (StoredPage::from(PageRecord::new(page_key.clone(), locale, metadata)), view)
            }
            LocalizationMode::Flat => {
                let record = FlatPageRecord::new(page_key.clone(), metadata);
                let view = PageView::from(record.clone());
                (StoredPage::from(record), view)
            }
        };

        WriteSequence::new("create page")
            .compensated_step(
                "write page record",
                StoreOp::put(page_key.as_str(), encode(&stored)?),
                StoreOp::delete(page_key.as_str()),
            )
            .step(
                "write content document",
                StoreOp::put(content_key.as_str(), template.into_value()),
            )
            .run(self.store.as_ref())
            .await?;

        info!(page = %page_key, locale = view.locale.as_deref().unwrap_or("-"), permalink, "page created");
        Ok(view)
    }

    /// Overwrite a page record, last writer wins.
    pub async fn update_page(&self, page: &StoredPage) -> PageResult<()> {
        let key = page.key();
        require_key(key)?;
        match (self.mode, page) {
            (LocalizationMode::Localized, StoredPage::Localized(record)) if record.locales.is_empty() => {
                return Err(PageError::Validation(format!("page {key} has no locales")));
            }
            (LocalizationMode::Localized, StoredPage::Flat(_)) => {
                return Err(PageError::Validation(format!(
                    "page {key} is flat but the service is localized"
                )));
            }
            (LocalizationMode::Flat, StoredPage::Localized(_)) => {
                return Err(PageError::Validation(format!(
                    "page {key} is localized but the service is flat"
                )));
            }
            _ => {}
        }
        put_typed(self.store.as_ref(), key.as_str(), page).await?;
        info!(page = %key, "page updated");
        Ok(())
    }

    /// Write the content of a page in `locale`.
    ///
    /// A locale the page does not have yet is added, copying its display
    /// attributes from the default locale (or, if the page lacks it, the
    /// first locale in code order). Repeating the call rewrites the
    /// same content document.
    pub async fn update_page_content(
        &self,
        page_key: &PageKey,
        content: ContentDocument,
        locale: Option<&str>,
    ) -> PageResult<()> {
        require_key(page_key)?;
        if content.is_unspecified() {
            return Err(PageError::missing_parameter("content"));
        }
        match self.mode {
            LocalizationMode::Localized => {
                let record = self.load_localized(page_key).await?;
                self.update_localized_content(record, content, locale).await
            }
            LocalizationMode::Flat => {
                let record = self.load_flat(page_key).await?;
                self.update_flat_content(record, content).await
            }
        }
    }

    /// Delete a page, or one locale of it.
    ///
    /// Removing the only locale removes the page. The default locale cannot
    /// be removed while other locales fall back to it.
    pub async fn delete_page(&self, page_key: &PageKey, locale: Option<&str>) -> PageResult<()> {
        if self.mode == LocalizationMode::Flat {
            let record = self.load_flat(page_key).await?;
            return self
                .remove_page(page_key, record.content_key.into_iter().collect())
                .await;
        }

        let record = self.load_localized(page_key).await?;
        let requested = self.requested_locale(locale).await?;
        let Some(metadata) = record.locale(&requested) else {
            return Err(PageError::NotFound(format!("locale {requested} of page {page_key}")));
        };

        if record.locales.len() == 1 {
            debug!(page = %page_key, locale = %requested, "last locale removed, deleting page");
            return self.remove_page(page_key, record.content_keys()).await;
        }

        let default = self.default_locale().await?;
        if requested == default {
            return Err(PageError::Validation(format!(
                "cannot delete default locale {default} of page {page_key} while other locales fall back to it"
            )));
        }

        let node = self.config.keys.locale_node(page_key, &requested);
        let (content, node) = tokio::join!(
            self.delete_content(metadata.content_key.as_ref()),
            self.store.delete(&node)
        );
        content?;
        node?;
        info!(page = %page_key, locale = %requested, "page locale deleted");
        Ok(())
    }

    /// Delete a page with every locale and content document.
    pub async fn purge_page(&self, page_key: &PageKey) -> PageResult<()> {
        let content_keys = match self.load(page_key).await? {
            StoredPage::Localized(record) => record.content_keys(),
            StoredPage::Flat(record) => record.content_key.into_iter().collect(),
        };
        self.remove_page(page_key, content_keys).await
    }

    async fn update_localized_content(
        &self,
        record: PageRecord,
        content: ContentDocument,
        locale: Option<&str>,
    ) -> PageResult<()> {
        let requested = self.requested_locale(locale).await?;
        let page_key = record.key.clone();

        let mut updated = record.clone();
        let content_key = match record.locale(&requested).map(|m| m.content_key.clone()) {
            Some(Some(existing)) => {
                self.store
                    .put(existing.as_str(), content.into_value())
                    .await?;
                debug!(page = %page_key, locale = %requested, content = %existing, "content rewritten");
                return Ok(());
            }
            Some(None) => {
                let allocated = self.config.keys.new_content_key();
                if let Some(metadata) = updated.locale_mut(&requested) {
                    metadata.content_key = Some(allocated.clone());
                }
                allocated
            }
            None => {
                if !self.locales.is_installed(&requested).await? {
                    return Err(LocaleError::UnknownLocale(requested).into());
                }
                let default = self.default_locale().await?;
                let (source_code, source) = fallback_locale(&record, &default)?;
                let allocated = self.config.keys.new_content_key();
                updated.locales.insert(
                    requested.clone(),
                    LocaleMetadata::derived_from(source, allocated.clone()),
                );
                info!(page = %page_key, locale = %requested, from = source_code, "page locale added");
                allocated
            }
        };
        debug!(page = %page_key, locale = %requested, content = %content_key, "content key allocated");

        WriteSequence::new("update page content")
            .compensated_step(
                "write page record",
                StoreOp::put(page_key.as_str(), encode(&updated)?),
                StoreOp::put(page_key.as_str(), encode(&record)?),
            )
            .step(
                "write content document",
                StoreOp::put(content_key.as_str(), content.into_value()),
            )
            .run(self.store.as_ref())
            .await?;
        Ok(())
    }

    async fn update_flat_content(&self, record: FlatPageRecord, content: ContentDocument) -> PageResult<()> {
        if let Some(existing) = &record.content_key {
            self.store
                .put(existing.as_str(), content.into_value())
                .await?;
            return Ok(());
        }

        let allocated = self.config.keys.new_content_key();
        let updated = FlatPageRecord {
            content_key: Some(allocated.clone()),
            ..record.clone()
        };
        debug!(page = %record.key, content = %allocated, "content key allocated");

        WriteSequence::new("update page content")
            .compensated_step(
                "write page record",
                StoreOp::put(record.key.as_str(), encode(&updated)?),
                StoreOp::put(record.key.as_str(), encode(&record)?),
            )
            .step(
                "write content document",
                StoreOp::put(allocated.as_str(), content.into_value()),
            )
            .run(self.store.as_ref())
            .await?;
        Ok(())
    }

    async fn delete_content(&self, key: Option<&ContentKey>) -> StoreResult<bool> {
        match key {
            Some(key) => self.store.delete(key.as_str()).await,
            None => Ok(false),
        }
    }

    /// Delete the record and its content documents concurrently. Every
    /// delete is awaited; the first failure is returned and the others stay
    /// applied.
    async fn remove_page(&self, page_key: &PageKey, content_keys: Vec<ContentKey>) -> PageResult<()> {
        let mut deletes = JoinSet::new();
        let keys = std::iter::once(page_key.as_str().to_string())
            .chain(content_keys.iter().map(|k| k.as_str().to_string()));
        for key in keys {
            let store = Arc::clone(&self.store);
            deletes.spawn(async move { store.delete(&key).await });
        }

        let mut first_error = None;
        while let Some(joined) = deletes.join_next().await {
            let outcome = joined
                .map_err(|e| StoreError::Unavailable(format!("delete task failed: {e}")))
                .and_then(|deleted| deleted);
            if let Err(e) = outcome {
                warn!(page = %page_key, error = %e, "page delete incomplete");
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => {
                info!(page = %page_key, documents = content_keys.len(), "page deleted");
                Ok(())
            }
        }
    }
}
