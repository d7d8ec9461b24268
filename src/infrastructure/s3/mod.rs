// SPDX-License-Identifier: MPL-2.0
//! Unauthenticated HTTP access to a public bucket.
//!
//! Implements [`ObjectLister`] with paged `ListObjectsV2` requests and
//! [`MetadataReader`] with `HEAD` requests on public object URLs.

mod head;
mod list;

pub use head::{metadata_from_headers, USER_METADATA_PREFIX};
pub use list::{error_message, parse_list_response, ListPage};

use crate::application::port::{MetadataReader, ObjectLister, TransportError};
use crate::config::StorageConfig;
use crate::domain::gallery::ItemMetadata;
use crate::domain::storage::ObjectSummary;
use async_trait::async_trait;
use reqwest::{Client, Response};
use tracing::debug;

/// User agent sent with every request.
pub(crate) const USER_AGENT: &str = concat!("BucketRoster/", env!("CARGO_PKG_VERSION"));

/// Upper bound on pages followed by one listing.
const MAX_PAGES: usize = 1000;

/// Public bucket reachable over plain HTTPS.
#[derive(Debug, Clone)]
pub struct S3HttpStore {
    client: Client,
    bucket_url: String,
}

impl S3HttpStore {
    /// Creates a store listing `bucket_url` (`<storage-root>/<bucket>`).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Network`] if the HTTP client cannot be built.
    pub fn new(bucket_url: impl Into<String>) -> Result<Self, TransportError> {
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            bucket_url: bucket_url.into(),
        })
    }

    /// Creates a store for the configured bucket.
    ///
    /// # Errors
    ///
    /// See [`S3HttpStore::new`].
    pub fn from_config(storage: &StorageConfig) -> Result<Self, TransportError> {
        Self::new(storage.bucket_api_url())
    }

    async fn list_page(
        &self,
        prefix: &str,
        token: Option<&str>,
    ) -> Result<ListPage, TransportError> {
        let mut query = vec![("list-type", "2"), ("prefix", prefix)];
        if let Some(token) = token {
            query.push(("continuation-token", token));
        }

        let response = self.client.get(&self.bucket_url).query(&query).send().await?;
        let body = ensure_success(response).await?.text().await?;
        parse_list_response(&body)
    }
}

/// Turns a non-success response into [`TransportError::Http`], using the
/// S3 error document's message when there is one.
async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    Err(TransportError::Http {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ObjectLister for S3HttpStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, TransportError> {
        let mut objects = Vec::new();
        let mut token: Option<String> = None;

        for page_number in 1..=MAX_PAGES {
            let page = self.list_page(prefix, token.as_deref()).await?;
            debug!(
                prefix,
                page = page_number,
                count = page.objects.len(),
                "listing page received"
            );
            objects.extend(page.objects);

            match (page.is_truncated, page.next_token) {
                (true, Some(next)) => token = Some(next),
                (true, None) => {
                    return Err(TransportError::Decode(
                        "truncated listing without continuation token".to_string(),
                    ));
                }
                (false, _) => return Ok(objects),
            }
        }

        Err(TransportError::Decode(format!(
            "listing did not finish within {MAX_PAGES} pages"
        )))
    }
}

#[async_trait]
impl MetadataReader for S3HttpStore {
    async fn read_metadata(&self, url: &str) -> Result<ItemMetadata, TransportError> {
        let response = self.client.head(url).send().await?;
        let response = ensure_success(response).await?;
        Ok(metadata_from_headers(response.headers()))
    }
}
