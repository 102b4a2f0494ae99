//! Storage key validation.
//!
//! Keys are `/`-separated paths into the object tree. Valid keys:
//! - Must be non-empty
//! - Must not start or end with `/`
//! - Must not contain empty segments (`//`)
//! - Must not contain `.` or `..` segments
//! - Must not contain whitespace other than a plain space, or `\`

use crate::error::{StoreError, StoreResult};

/// Characters that are forbidden anywhere in a key.
const FORBIDDEN_CHARS: &[char] = &['\t', '\n', '\r', '\\', '\0'];

/// Validate a storage key and split it into its segments.
///
/// # Examples
///
/// ```
/// use folio_store::keys::split_key;
///
/// assert_eq!(split_key("pages/abc").unwrap(), vec!["pages", "abc"]);
/// assert!(split_key("").is_err());
/// assert!(split_key("pages//abc").is_err());
/// ```
pub fn split_key(key: &str) -> StoreResult<Vec<&str>> {
    if key.is_empty() {
        return Err(StoreError::invalid_key(key, "key must not be empty"));
    }

    for ch in FORBIDDEN_CHARS {
        if key.contains(*ch) {
            return Err(StoreError::invalid_key(
                key,
                format!("contains forbidden character: {ch:?}"),
            ));
        }
    }

    if key.starts_with('/') || key.ends_with('/') {
        return Err(StoreError::invalid_key(key, "must not start or end with '/'"));
    }

    let segments: Vec<&str> = key.split('/').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(StoreError::invalid_key(key, "path segments must not be empty"));
        }
        if *segment == "." || *segment == ".." {
            return Err(StoreError::invalid_key(
                key,
                format!("relative segment not allowed: {segment:?}"),
            ));
        }
    }

    Ok(segments)
}

/// Validate a storage key, returning `Ok(())` if well-formed.
pub fn validate_key(key: &str) -> StoreResult<()> {
    split_key(key).map(|_| ())
}
