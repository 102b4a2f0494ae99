use serde::{Deserialize, Serialize};

use crate::model::LocaleModel;

/// Configuration for an [`InMemoryLocaleRegistry`](crate::InMemoryLocaleRegistry).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocaleConfig {
    /// Whether pages are stored per locale.
    pub enabled: bool,
    /// Fallback locale. Always installed.
    pub default_locale: String,
    /// Initial current locale. Defaults to `default_locale`.
    pub current_locale: Option<String>,
    /// Installed locales.
    pub locales: Vec<LocaleModel>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_locale: "en-us".into(),
            current_locale: None,
            locales: vec![LocaleModel {
                code: "en-us".into(),
                display_name: "English (US)".into(),
            }],
        }
    }
}

impl LocaleConfig {
    /// A configuration with localization switched off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Default::default()
        }
    }
}
