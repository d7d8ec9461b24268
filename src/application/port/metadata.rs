// SPDX-License-Identifier: MPL-2.0
//! Per-object metadata ports.
//!
//! Reading goes straight to the public object (HEAD); writing goes through
//! the backend API, which copies the object onto itself with merged metadata.

use super::TransportError;
use crate::domain::gallery::ItemMetadata;
use async_trait::async_trait;

/// Reads caption and position of one object.
#[async_trait]
pub trait MetadataReader: Send + Sync {
    /// Missing fields come back as their defaults (empty caption, unset
    /// position); only transport failures are errors.
    async fn read_metadata(&self, url: &str) -> Result<ItemMetadata, TransportError>;
}

/// Persists caption and position of one object.
#[async_trait]
pub trait MetadataWriter: Send + Sync {
    /// Writes the whole record; there is no partial success.
    async fn write_metadata(&self, key: &str, metadata: &ItemMetadata)
        -> Result<(), TransportError>;
}
