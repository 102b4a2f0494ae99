//! Page records and their resolved view.
//!
//! A page is stored either as a [`PageRecord`] (one [`LocaleMetadata`] entry
//! per locale) or, when localization is disabled, as a [`FlatPageRecord`]
//! carrying the same fields inline. Both decode strictly: an object with
//! unknown fields is rejected rather than trusted.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::keys::{ContentKey, PageKey};

/// Attribute of a page record holding the per-locale map.
pub const LOCALE_PREFIX: &str = "locales";

/// Locale-specific attributes of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LocaleMetadata {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    pub permalink: String,
    /// Content document for this locale. `None` until first authored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_key: Option<ContentKey>,
}

impl LocaleMetadata {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        keywords: impl Into<String>,
        permalink: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            keywords: keywords.into(),
            permalink: permalink.into(),
            content_key: None,
        }
    }

    pub fn with_content_key(mut self, key: ContentKey) -> Self {
        self.content_key = Some(key);
        self
    }

    /// A fresh entry for a locale that has never been edited: display
    /// attributes are copied from `source`, keywords and content are not.
    pub fn derived_from(source: &LocaleMetadata, content_key: ContentKey) -> Self {
        Self {
            title: source.title.clone(),
            description: source.description.clone(),
            keywords: String::new(),
            permalink: source.permalink.clone(),
            content_key: Some(content_key),
        }
    }
}

/// Multi-locale page record, the storage-resident form.
///
/// Invariant: `locales` holds at least one entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PageRecord {
    pub key: PageKey,
    pub locales: BTreeMap<String, LocaleMetadata>,
}

impl PageRecord {
    /// A record with a single populated locale.
    pub fn new(key: PageKey, locale: impl Into<String>, metadata: LocaleMetadata) -> Self {
        let mut locales = BTreeMap::new();
        locales.insert(locale.into(), metadata);
        Self { key, locales }
    }

    pub fn locale(&self, code: &str) -> Option<&LocaleMetadata> {
        self.locales.get(code)
    }

    pub fn locale_mut(&mut self, code: &str) -> Option<&mut LocaleMetadata> {
        self.locales.get_mut(code)
    }

    pub fn has_locale(&self, code: &str) -> bool {
        self.locales.contains_key(code)
    }

    /// Locale codes present on this record, in ascending order.
    pub fn locale_codes(&self) -> Vec<String> {
        self.locales.keys().cloned().collect()
    }

    /// Every content key referenced by any locale.
    pub fn content_keys(&self) -> Vec<ContentKey> {
        self.locales
            .values()
            .filter_map(|m| m.content_key.clone())
            .collect()
    }
}

/// Unlocalized page record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FlatPageRecord {
    pub key: PageKey,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub keywords: String,
    pub permalink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_key: Option<ContentKey>,
}

impl FlatPageRecord {
    pub fn new(key: PageKey, metadata: LocaleMetadata) -> Self {
        Self {
            key,
            title: metadata.title,
            description: metadata.description,
            keywords: metadata.keywords,
            permalink: metadata.permalink,
            content_key: metadata.content_key,
        }
    }
}

/// A page as found in the store, in either form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredPage {
    Localized(PageRecord),
    Flat(FlatPageRecord),
}

impl StoredPage {
    pub fn key(&self) -> &PageKey {
        match self {
            Self::Localized(record) => &record.key,
            Self::Flat(record) => &record.key,
        }
    }

    pub fn is_localized(&self) -> bool {
        matches!(self, Self::Localized(_))
    }

    pub fn as_localized(&self) -> Option<&PageRecord> {
        match self {
            Self::Localized(record) => Some(record),
            Self::Flat(_) => None,
        }
    }

    pub fn as_flat(&self) -> Option<&FlatPageRecord> {
        match self {
            Self::Flat(record) => Some(record),
            Self::Localized(_) => None,
        }
    }
}

impl From<PageRecord> for StoredPage {
    fn from(record: PageRecord) -> Self {
        Self::Localized(record)
    }
}

impl From<FlatPageRecord> for StoredPage {
    fn from(record: FlatPageRecord) -> Self {
        Self::Flat(record)
    }
}

/// Locale-resolved, flattened projection of a page returned by reads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    pub key: PageKey,
    /// Locale whose metadata was selected; `None` for flat pages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub title: String,
    pub description: String,
    pub keywords: String,
    pub permalink: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_key: Option<ContentKey>,
}

impl PageView {
    pub fn localized(key: PageKey, locale: impl Into<String>, metadata: &LocaleMetadata) -> Self {
        Self {
            key,
            locale: Some(locale.into()),
            title: metadata.title.clone(),
            description: metadata.description.clone(),
            keywords: metadata.keywords.clone(),
            permalink: metadata.permalink.clone(),
            content_key: metadata.content_key.clone(),
        }
    }
}

impl From<FlatPageRecord> for PageView {
    fn from(record: FlatPageRecord) -> Self {
        Self {
            key: record.key,
            locale: None,
            title: record.title,
            description: record.description,
            keywords: record.keywords,
            permalink: record.permalink,
            content_key: record.content_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn about() -> LocaleMetadata {
        LocaleMetadata::new("About", "About us", "company", "/about")
            .with_content_key(ContentKey::new("files/1"))
    }

    #[test]
    fn record_uses_camel_case_wire_format() {
        let record = PageRecord::new(PageKey::new("pages/1"), "en-us", about());
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "key": "pages/1",
                "locales": {
                    "en-us": {
                        "title": "About",
                        "description": "About us",
                        "keywords": "company",
                        "permalink": "/about",
                        "contentKey": "files/1"
                    }
                }
            })
        );
    }

    #[test]
    fn missing_content_key_is_omitted() {
        let meta = LocaleMetadata::new("About", "", "", "/about");
        let value = serde_json::to_value(&meta).unwrap();
        assert!(value.get("contentKey").is_none());
    }

    #[test]
    fn stored_page_decodes_localized_form() {
        let page: StoredPage = serde_json::from_value(json!({
            "key": "pages/1",
            "locales": { "en-us": { "title": "A", "permalink": "/a" } }
        }))
        .unwrap();
        let record = page.as_localized().expect("localized");
        assert_eq!(record.locale("en-us").unwrap().description, "");
        assert!(record.locale("en-us").unwrap().content_key.is_none());
    }

    #[test]
    fn stored_page_decodes_flat_form() {
        let page: StoredPage = serde_json::from_value(json!({
            "key": "pages/2",
            "title": "B",
            "permalink": "/b",
            "contentKey": "files/2"
        }))
        .unwrap();
        let flat = page.as_flat().expect("flat");
        assert_eq!(flat.content_key, Some(ContentKey::new("files/2")));
        assert!(!page.is_localized());
    }

    #[test]
    fn unknown_shapes_are_rejected() {
        let err = serde_json::from_value::<StoredPage>(json!({
            "key": "pages/3",
            "locales": {},
            "owner": "mallory"
        }));
        assert!(err.is_err());

        let err = serde_json::from_value::<StoredPage>(json!({ "key": "pages/4" }));
        assert!(err.is_err());
    }

    #[test]
    fn derived_entry_copies_display_fields_only() {
        let derived = LocaleMetadata::derived_from(&about(), ContentKey::new("files/9"));
        assert_eq!(derived.title, "About");
        assert_eq!(derived.description, "About us");
        assert_eq!(derived.permalink, "/about");
        assert_eq!(derived.keywords, "");
        assert_eq!(derived.content_key, Some(ContentKey::new("files/9")));
    }

    #[test]
    fn content_keys_collects_every_locale() {
        let mut record = PageRecord::new(PageKey::new("pages/1"), "en-us", about());
        record.locales.insert(
            "fr-fr".into(),
            LocaleMetadata::new("A propos", "", "", "/a-propos"),
        );
        record.locales.insert(
            "de-de".into(),
            LocaleMetadata::new("Uber", "", "", "/uber").with_content_key(ContentKey::new("files/2")),
        );
        let keys = record.content_keys();
        assert_eq!(keys.len(), 2);
        assert_eq!(record.locale_codes(), vec!["de-de", "en-us", "fr-fr"]);
    }

    #[test]
    fn view_from_flat_record_has_no_locale() {
        let flat = FlatPageRecord::new(PageKey::new("pages/5"), about());
        let view = PageView::from(flat);
        assert!(view.locale.is_none());
        assert_eq!(view.title, "About");
    }
}
