use folio_locale::LocaleError;
use folio_store::StoreError;
use thiserror::Error;

use crate::sequence::SequenceFailure;
use crate::template::TemplateError;

/// Errors from page service operations.
#[derive(Debug, Error)]
pub enum PageError {
    /// A required argument is missing or malformed. Raised before any I/O.
    #[error("validation error: {0}")]
    Validation(String),

    /// The page, locale, or content does not resolve to a stored value.
    #[error("not found: {0}")]
    NotFound(String),

    /// The underlying store call failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The locale registry failed.
    #[error("locale error: {0}")]
    Locale(#[from] LocaleError),

    /// The new-page template could not be loaded.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Stored data violates a page invariant, or a partial write could not
    /// be undone.
    #[error("inconsistent state at {key}: {reason}")]
    InconsistentState { key: String, reason: String },
}

impl PageError {
    pub(crate) fn inconsistent(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InconsistentState {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn missing_parameter(name: &str) -> Self {
        Self::Validation(format!("parameter \"{name}\" not specified"))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_inconsistent(&self) -> bool {
        matches!(self, Self::InconsistentState { .. })
    }
}

impl From<SequenceFailure> for PageError {
    fn from(failure: SequenceFailure) -> Self {
        if failure.compensated {
            Self::Store(failure.source)
        } else {
            Self::InconsistentState {
                key: failure.key,
                reason: format!(
                    "{}: step '{}' failed ({}) and completed steps were not undone",
                    failure.sequence, failure.step, failure.source
                ),
            }
        }
    }
}

/// Result alias for page service operations.
pub type PageResult<T> = Result<T, PageError>;
