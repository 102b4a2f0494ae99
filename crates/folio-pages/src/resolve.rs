//! Locale fallback for page metadata and content.

use folio_types::{ContentKey, LocaleMetadata, PageRecord, PageView};

use crate::error::{PageError, PageResult};

/// Metadata selected for a requested locale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedLocale<'a> {
    /// Locale the metadata belongs to.
    pub code: &'a str,
    pub metadata: &'a LocaleMetadata,
    /// True when the requested locale was missing and a fallback entry was used.
    pub fell_back: bool,
}

impl ResolvedLocale<'_> {
    pub fn to_view(&self, record: &PageRecord) -> PageView {
        PageView::localized(record.key.clone(), self.code, self.metadata)
    }
}

/// Select the metadata for `requested`, falling back to `default`, then to
/// the first locale in code order.
///
/// The last step covers pages created while the current locale was not the
/// default. Only a record with no locales at all is inconsistent.
pub fn resolve_locale<'a>(
    record: &'a PageRecord,
    requested: &str,
    default: &str,
) -> PageResult<ResolvedLocale<'a>> {
    if let Some((code, metadata)) = record.locales.get_key_value(requested) {
        return Ok(ResolvedLocale {
            code,
            metadata,
            fell_back: false,
        });
    }
    let (code, metadata) = fallback_locale(record, default)?;
    Ok(ResolvedLocale {
        code,
        metadata,
        fell_back: true,
    })
}

/// The entry other locales inherit from: `default` if present, else the
/// first locale in code order.
pub fn fallback_locale<'a>(
    record: &'a PageRecord,
    default: &str,
) -> PageResult<(&'a str, &'a LocaleMetadata)> {
    record
        .locales
        .get_key_value(default)
        .or_else(|| record.locales.iter().next())
        .map(|(code, metadata)| (code.as_str(), metadata))
        .ok_or_else(|| PageError::inconsistent(record.key.as_str(), "page record has no locales"))
}

/// Content key for a resolved locale.
///
/// Falls back to the [`fallback_locale`] content independently of metadata
/// resolution, so a locale with metadata but no authored body still renders.
pub fn resolve_content_key<'a>(
    record: &'a PageRecord,
    resolved: &ResolvedLocale<'a>,
    default: &str,
) -> PageResult<&'a ContentKey> {
    resolved
        .metadata
        .content_key
        .as_ref()
        .or_else(|| {
            fallback_locale(record, default)
                .ok()
                .and_then(|(_, m)| m.content_key.as_ref())
        })
        .ok_or_else(|| PageError::NotFound(format!("content of page {}", record.key)))
}
