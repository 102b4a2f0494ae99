use std::fmt;

use folio_types::KeyLayout;
use serde::{Deserialize, Serialize};

/// How pages are stored, chosen once when the service is built.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalizationMode {
    /// One metadata entry per locale, with default-locale fallback.
    Localized,
    /// A single unlocalized record per page.
    Flat,
}

impl LocalizationMode {
    pub fn from_enabled(enabled: bool) -> Self {
        if enabled {
            Self::Localized
        } else {
            Self::Flat
        }
    }
}

impl fmt::Display for LocalizationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Localized => write!(f, "localized"),
            Self::Flat => write!(f, "flat"),
        }
    }
}

/// Configuration for the page service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PageServiceConfig {
    /// Key derivation for page records and content documents.
    pub keys: KeyLayout,
    /// Template used to seed the content of every new page.
    pub template_key: String,
}

impl Default for PageServiceConfig {
    fn default() -> Self {
        Self {
            keys: KeyLayout::default(),
            template_key: "blocks/new-page-template".into(),
        }
    }
}
