//! Locale descriptors and code validation.
//!
//! Valid locale codes:
//! - A 2-3 letter language subtag (`en`, `fil`)
//! - Optionally followed by `-` and a 2-4 character alphanumeric region or
//!   script subtag (`en-us`, `zh-hant`, `es-419`)
//! - Lowercase only; [`normalize_locale_code`] lowercases input first

use serde::{Deserialize, Serialize};

use crate::error::{LocaleError, LocaleResult};

/// An installed locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleModel {
    pub code: String,
    pub display_name: String,
}

impl LocaleModel {
    /// Build a model after validating `code`.
    pub fn new(code: impl Into<String>, display_name: impl Into<String>) -> LocaleResult<Self> {
        let code = normalize_locale_code(&code.into())?;
        Ok(Self {
            code,
            display_name: display_name.into(),
        })
    }
}

/// Validate a locale code, returning `Ok(())` if well-formed.
///
/// # Examples
///
/// ```
/// use folio_locale::validate_locale_code;
///
/// assert!(validate_locale_code("en-us").is_ok());
/// assert!(validate_locale_code("fr").is_ok());
/// assert!(validate_locale_code("").is_err());
/// assert!(validate_locale_code("en/us").is_err());
/// ```
pub fn validate_locale_code(code: &str) -> LocaleResult<()> {
    let invalid = |reason: &str| LocaleError::InvalidCode {
        code: code.to_string(),
        reason: reason.to_string(),
    };

    if code.is_empty() {
        return Err(invalid("locale code must not be empty"));
    }

    let mut parts = code.split('-');
    let language = parts.next().unwrap_or_default();
    if !(2..=3).contains(&language.len()) || !language.chars().all(|c| c.is_ascii_lowercase()) {
        return Err(invalid("language subtag must be 2-3 lowercase letters"));
    }

    if let Some(region) = parts.next() {
        if !(2..=4).contains(&region.len())
            || !region
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(invalid("region subtag must be 2-4 lowercase alphanumerics"));
        }
    }

    if parts.next().is_some() {
        return Err(invalid("at most one '-' separator is allowed"));
    }

    Ok(())
}

/// Lowercase and trim `code`, then validate it.
pub fn normalize_locale_code(code: &str) -> LocaleResult<String> {
    let normalized = code.trim().to_ascii_lowercase();
    validate_locale_code(&normalized)?;
    Ok(normalized)
}
