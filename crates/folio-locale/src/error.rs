//! Error types for locale registry operations.

use thiserror::Error;

/// Errors that can occur during locale registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LocaleError {
    /// The locale code is malformed.
    #[error("invalid locale code: {code:?}: {reason}")]
    InvalidCode { code: String, reason: String },

    /// The locale is not installed.
    #[error("unknown locale: {0}")]
    UnknownLocale(String),

    /// A locale with this code is already installed.
    #[error("locale already exists: {0}")]
    AlreadyExists(String),

    /// The default locale cannot be removed.
    #[error("cannot delete default locale: {0}")]
    DefaultLocale(String),

    /// Registry state is unavailable (lock poisoned, backend failure).
    #[error("locale registry unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for locale operations.
pub type LocaleResult<T> = std::result::Result<T, LocaleError>;
