//! Foundation types for Folio.
//!
//! This crate provides the storage-resident and consumer-facing shapes of a
//! page. Every other Folio crate depends on `folio-types`.
//!
//! # Key Types
//!
//! - [`PageRecord`] -- Multi-locale page container keyed by locale code
//! - [`FlatPageRecord`] -- Unlocalized page form used when localization is off
//! - [`StoredPage`] -- Either stored form, decoded strictly
//! - [`LocaleMetadata`] -- Per-locale title, description, keywords, permalink, content key
//! - [`ContentDocument`] -- Opaque page body
//! - [`PageView`] -- Locale-resolved, flattened read projection
//! - [`KeyLayout`] -- Storage key derivation for pages, content, and locale nodes

pub mod content;
pub mod keys;
pub mod page;

pub use content::ContentDocument;
pub use keys::{ContentKey, KeyLayout, PageKey};
pub use page::{FlatPageRecord, LocaleMetadata, PageRecord, PageView, StoredPage};
