//! The [`LocaleRegistry`] trait consumed by the page service.

use async_trait::async_trait;

use crate::error::LocaleResult;
use crate::model::LocaleModel;

/// Source of locale information.
///
/// The page service asks the registry for the caller's current locale
/// whenever an operation is invoked without an explicit locale, and for the
/// default locale whenever it needs a fallback.
#[async_trait]
pub trait LocaleRegistry: Send + Sync {
    /// All installed locales.
    async fn locales(&self) -> LocaleResult<Vec<LocaleModel>>;

    /// The fallback locale.
    async fn default_locale(&self) -> LocaleResult<String>;

    /// The locale the caller is currently working in.
    async fn current_locale(&self) -> LocaleResult<String>;

    /// Whether pages are stored per locale at all.
    async fn is_localization_enabled(&self) -> LocaleResult<bool>;

    /// Whether `code` is installed.
    async fn is_installed(&self, code: &str) -> LocaleResult<bool> {
        Ok(self.locales().await?.iter().any(|l| l.code == code))
    }
}
