// SPDX-License-Identifier: MPL-2.0
//! Gallery item and its remote metadata record.

use super::GalleryError;
use crate::domain::storage::{join_url, ObjectSummary};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// Metadata key holding the caption.
pub const CAPTION_KEY: &str = "caption";

/// Metadata key holding the sort position.
pub const POSITION_KEY: &str = "position";

/// Longest caption accepted by the writer, in bytes.
///
/// Object stores cap user metadata at 2 KiB per object; this leaves room for
/// the position and any other keys already on the object.
pub const MAX_CAPTION_BYTES: usize = 1024;

// =============================================================================
// Position
// =============================================================================

/// Remote sort order of a gallery item. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position(u32);

impl Position {
    /// Sentinel for items that were never positioned; sorts them last.
    pub const UNSET: Position = Position(100_000);

    #[must_use]
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    /// Position for a 0-based list index.
    #[must_use]
    pub fn from_index(index: usize) -> Self {
        Self(u32::try_from(index).unwrap_or(u32::MAX))
    }

    /// Parses a header value, ignoring surrounding whitespace.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u32>().ok().map(Self)
    }

    #[must_use]
    pub fn value(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::UNSET
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// ItemMetadata
// =============================================================================

/// Caption and position as stored on the remote object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemMetadata {
    pub caption: String,
    pub position: Position,
}

impl ItemMetadata {
    #[must_use]
    pub fn new(caption: impl Into<String>, position: Position) -> Self {
        Self {
            caption: caption.into(),
            position,
        }
    }

    /// Checks that the record can be written as object metadata.
    ///
    /// # Errors
    ///
    /// Returns [`GalleryError::InvalidCaption`] for captions that are too long
    /// or contain control characters (metadata travels as HTTP headers).
    pub fn validate(&self) -> Result<(), GalleryError> {
        if self.caption.len() > MAX_CAPTION_BYTES {
            return Err(GalleryError::InvalidCaption(format!(
                "caption is {} bytes, limit is {MAX_CAPTION_BYTES}",
                self.caption.len()
            )));
        }
        if self.caption.chars().any(char::is_control) {
            return Err(GalleryError::InvalidCaption(
                "caption contains control characters".to_string(),
            ));
        }
        Ok(())
    }

    /// String map sent to the metadata endpoint.
    #[must_use]
    pub fn to_remote_map(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            (CAPTION_KEY.to_string(), self.caption.clone()),
            (POSITION_KEY.to_string(), self.position.to_string()),
        ])
    }
}

// =============================================================================
// GalleryItem
// =============================================================================

/// One image of the gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryItem {
    pub key: String,
    pub url: String,
    pub caption: String,
    pub position: Position,
    pub size: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

impl GalleryItem {
    /// Joins a listing record with the metadata read for it.
    #[must_use]
    pub fn from_summary(summary: ObjectSummary, public_url: &str, metadata: ItemMetadata) -> Self {
        Self {
            url: join_url(public_url, &summary.key),
            key: summary.key,
            caption: metadata.caption,
            position: metadata.position,
            size: summary.size,
            last_modified: summary.last_modified,
        }
    }

    /// The record the writer persists for this item.
    #[must_use]
    pub fn metadata(&self) -> ItemMetadata {
        ItemMetadata::new(self.caption.clone(), self.position)
    }
}
