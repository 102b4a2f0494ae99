use std::path::{Path, PathBuf};

use anyhow::Context;
use folio_locale::LocaleConfig;
use folio_pages::PageServiceConfig;
use serde::{Deserialize, Serialize};

/// Contents of `folio.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FolioConfig {
    /// JSON file backing the object store.
    pub store_path: PathBuf,
    pub pages: PageServiceConfig,
    pub locales: LocaleConfig,
}

impl Default for FolioConfig {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from("folio-store.json"),
            pages: PageServiceConfig::default(),
            locales: LocaleConfig::default(),
        }
    }
}

impl FolioConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}
