// SPDX-License-Identifier: MPL-2.0
//! Bucket listing port.

use super::TransportError;
use crate::domain::storage::ObjectSummary;
use async_trait::async_trait;

/// Lists the objects of one bucket.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// Returns every object whose key starts with `prefix`.
    ///
    /// Order is irrelevant to callers; implementations return whatever the
    /// store returns.
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, TransportError>;
}
