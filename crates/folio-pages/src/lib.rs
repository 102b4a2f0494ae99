//! Page resolution and lifecycle for Folio.
//!
//! [`PageService`] turns a hierarchical object store into a multi-locale page
//! catalogue: lookup by key, permalink, or title with fallback to the default
//! locale; page creation seeded from a template; per-locale content
//! authoring; and locale-scoped or whole-page deletion.
//!
//! # Modules
//!
//! - [`error`] -- [`PageError`] and [`PageResult`]
//! - [`config`] -- [`PageServiceConfig`] and [`LocalizationMode`]
//! - [`resolve`] -- Locale and content fallback
//! - [`sequence`] -- Best-effort multi-key writes with compensation
//! - [`template`] -- New-page template sources
//! - [`service`] -- [`PageService`]

pub mod config;
pub mod error;
pub mod resolve;
pub mod sequence;
pub mod service;
pub mod template;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{LocalizationMode, PageServiceConfig};
pub use error::{PageError, PageResult};
pub use resolve::{fallback_locale, resolve_content_key, resolve_locale, ResolvedLocale};
pub use sequence::{SequenceFailure, StoreOp, WriteSequence, WriteStep};
pub use service::PageService;
pub use template::{StaticTemplateSource, StoreTemplateSource, TemplateError, TemplateSource};
