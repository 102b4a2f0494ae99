//! Locale registry for Folio.
//!
//! The registry answers three questions for the page service: which locale
//! is the caller working in, which locale is the fallback, and is
//! localization switched on at all.
//!
//! # Modules
//!
//! - [`error`] -- Error types for registry operations
//! - [`model`] -- [`LocaleModel`] and locale code validation
//! - [`traits`] -- The [`LocaleRegistry`] trait
//! - [`config`] -- [`LocaleConfig`]
//! - [`memory`] -- In-memory [`InMemoryLocaleRegistry`]

pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod traits;

pub use config::LocaleConfig;
pub use error::{LocaleError, LocaleResult};
pub use memory::InMemoryLocaleRegistry;
pub use model::{normalize_locale_code, validate_locale_code, LocaleModel};
pub use traits::LocaleRegistry;
