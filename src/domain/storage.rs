// SPDX-License-Identifier: MPL-2.0
//! Storage key and listing value objects.
//!
//! A storage key is an opaque `/`-delimited path. The helpers here never
//! normalise keys: `a//b` stays three segments, one of them empty.

use chrono::{DateTime, Utc};

/// Hierarchy delimiter used by object keys.
pub const KEY_DELIMITER: char = '/';

/// One record returned by a bucket listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectSummary {
    /// Full object key, including the leading folder segment.
    pub key: String,
    /// Object size in bytes.
    pub size: u64,
    /// Last modification time, when the listing reported one.
    pub last_modified: Option<DateTime<Utc>>,
}

impl ObjectSummary {
    /// Creates a summary with no modification time.
    #[must_use]
    pub fn new(key: impl Into<String>, size: u64) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified: None,
        }
    }
}

/// Joins a base URL and a key with exactly one `/` between them.
#[must_use]
pub fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

/// Returns `true` if `key` ends with one of `extensions` (case-insensitive).
///
/// Extensions are expected with their leading dot (`.png`).
#[must_use]
pub fn has_extension(key: &str, extensions: &[String]) -> bool {
    let lower = key.to_lowercase();
    extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_lowercase()))
}
