//! In-memory locale registry for tests and single-process use.
//!
//! [`InMemoryLocaleRegistry`] keeps its installed locales and the current
//! locale behind `RwLock`s. It implements [`LocaleRegistry`] and adds the
//! management operations an editor needs: switching the current locale and
//! installing or removing locales.

use std::sync::RwLock;

use async_trait::async_trait;
use tracing::debug;

use crate::config::LocaleConfig;
use crate::error::{LocaleError, LocaleResult};
use crate::model::{normalize_locale_code, LocaleModel};
use crate::traits::LocaleRegistry;

/// An in-memory implementation of [`LocaleRegistry`].
#[derive(Debug)]
pub struct InMemoryLocaleRegistry {
    enabled: bool,
    default_locale: String,
    current: RwLock<String>,
    locales: RwLock<Vec<LocaleModel>>,
}

impl InMemoryLocaleRegistry {
    /// Build a registry from configuration.
    ///
    /// The default locale is installed if the configuration does not list
    /// it. The current locale, when given, must be installed.
    pub fn from_config(config: LocaleConfig) -> LocaleResult<Self> {
        let default_locale = normalize_locale_code(&config.default_locale)?;

        let mut locales = Vec::with_capacity(config.locales.len() + 1);
        for model in config.locales {
            let model = LocaleModel::new(model.code, model.display_name)?;
            if locales.iter().any(|l: &LocaleModel| l.code == model.code) {
                return Err(LocaleError::AlreadyExists(model.code));
            }
            locales.push(model);
        }
        if !locales.iter().any(|l| l.code == default_locale) {
            locales.insert(
                0,
                LocaleModel {
                    code: default_locale.clone(),
                    display_name: default_locale.clone(),
                },
            );
        }

        let current = match config.current_locale {
            Some(code) => {
                let code = normalize_locale_code(&code)?;
                if !locales.iter().any(|l| l.code == code) {
                    return Err(LocaleError::UnknownLocale(code));
                }
                code
            }
            None => default_locale.clone(),
        };

        Ok(Self {
            enabled: config.enabled,
            default_locale,
            current: RwLock::new(current),
            locales: RwLock::new(locales),
        })
    }

    /// A registry with `en-us` as the only, default, and current locale.
    pub fn new() -> Self {
        Self {
            enabled: true,
            default_locale: "en-us".into(),
            current: RwLock::new("en-us".into()),
            locales: RwLock::new(LocaleConfig::default().locales),
        }
    }

    /// Switch the current locale. The locale must be installed.
    pub fn set_current_locale(&self, code: &str) -> LocaleResult<()> {
        let code = normalize_locale_code(code)?;
        if !self.installed(&code)? {
            return Err(LocaleError::UnknownLocale(code));
        }
        debug!(locale = %code, "current locale switched");
        *self.current.write().map_err(poisoned)? = code;
        Ok(())
    }

    /// Install a new locale.
    pub fn create_locale(&self, code: &str, display_name: &str) -> LocaleResult<()> {
        let model = LocaleModel::new(code, display_name)?;
        let mut locales = self.locales.write().map_err(poisoned)?;
        if locales.iter().any(|l| l.code == model.code) {
            return Err(LocaleError::AlreadyExists(model.code));
        }
        debug!(locale = %model.code, "locale installed");
        locales.push(model);
        Ok(())
    }

    /// Remove an installed locale.
    ///
    /// The default locale cannot be removed. Removing the current locale
    /// resets the current locale to the default.
    pub fn delete_locale(&self, code: &str) -> LocaleResult<()> {
        let code = normalize_locale_code(code)?;
        if code == self.default_locale {
            return Err(LocaleError::DefaultLocale(code));
        }
        {
            let mut locales = self.locales.write().map_err(poisoned)?;
            let before = locales.len();
            locales.retain(|l| l.code != code);
            if locales.len() == before {
                return Err(LocaleError::UnknownLocale(code));
            }
        }
        let mut current = self.current.write().map_err(poisoned)?;
        if *current == code {
            *current = self.default_locale.clone();
        }
        debug!(locale = %code, "locale removed");
        Ok(())
    }

    fn installed(&self, code: &str) -> LocaleResult<bool> {
        let locales = self.locales.read().map_err(poisoned)?;
        Ok(locales.iter().any(|l| l.code == code))
    }
}

impl Default for InMemoryLocaleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> LocaleError {
    LocaleError::Unavailable(format!("lock poisoned: {e}"))
}

#[async_trait]
impl LocaleRegistry for InMemoryLocaleRegistry {
    async fn locales(&self) -> LocaleResult<Vec<LocaleModel>> {
        Ok(self.locales.read().map_err(poisoned)?.clone())
    }

    async fn default_locale(&self) -> LocaleResult<String> {
        Ok(self.default_locale.clone())
    }

    async fn current_locale(&self) -> LocaleResult<String> {
        Ok(self.current.read().map_err(poisoned)?.clone())
    }

    async fn is_localization_enabled(&self) -> LocaleResult<bool> {
        Ok(self.enabled)
    }

    async fn is_installed(&self, code: &str) -> LocaleResult<bool> {
        self.installed(code)
    }
}
