//! Hierarchical key/value object storage for Folio.
//!
//! Objects are JSON values addressed by `/`-separated keys. The store is a
//! tree: `pages/abc` holds a page record and `pages/abc/locales/fr-fr`
//! addresses one node inside it, so a single locale can be read or deleted
//! without rewriting the whole record.
//!
//! # Storage Backends
//!
//! All backends implement the [`ObjectStore`] trait:
//!
//! - [`InMemoryObjectStore`] -- lock-guarded tree for tests and embedding
//! - [`JsonFileObjectStore`] -- tree persisted to one JSON file with atomic rename
//!
//! # Design Rules
//!
//! 1. Last writer wins. There are no multi-key transactions.
//! 2. Search results come back in ascending key order.
//! 3. The store never interprets object contents beyond query evaluation.
//! 4. Typed reads reject values of the wrong shape at the boundary.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod keys;
pub mod memory;
pub mod query;
pub mod traits;
pub mod tree;
pub mod typed;

pub use error::{StoreError, StoreResult};
pub use file::JsonFileObjectStore;
pub use keys::{split_key, validate_key};
pub use memory::InMemoryObjectStore;
pub use query::{Filter, Operator, Query};
pub use traits::ObjectStore;
pub use tree::ObjectTree;
pub use typed::{get_typed, put_typed};
