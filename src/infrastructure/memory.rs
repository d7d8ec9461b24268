// SPDX-License-Identifier: MPL-2.0
//! In-memory bucket implementing every port.
//!
//! Backs the `--demo` mode of the CLI and the tests. Individual keys (or the
//! whole listing) can be made to fail so partial-failure paths are testable
//! without a network.

use crate::application::port::{
    AdminApi, DeleteFilesReport, DeleteFolderReport, MetadataReader, MetadataWriter,
    ObjectLister, PresignedPost, TransportError, UploadFile, UploadRequest,
};
use crate::config::ARCHIVE_EXTENSION;
use crate::domain::gallery::{ItemMetadata, Position, CAPTION_KEY, POSITION_KEY};
use crate::domain::storage::{join_url, ObjectSummary, KEY_DELIMITER};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

const UPLOAD_URL: &str = "memory://upload";
const KEY_FIELD: &str = "key";
/// Folder archives are dropped into, waiting to be unpacked.
const ARCHIVE_FOLDER: &str = "uploads";

#[derive(Debug, Clone)]
struct StoredObject {
    summary: ObjectSummary,
    metadata: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    objects: BTreeMap<String, StoredObject>,
    failing_keys: BTreeSet<String>,
    listing_failure: Option<TransportError>,
    writes: Vec<(String, ItemMetadata)>,
}

/// Bucket held in memory. Objects iterate in key order.
#[derive(Debug)]
pub struct MemoryStore {
    public_url: String,
    inner: Mutex<Inner>,
}

impl MemoryStore {
    /// Creates an empty store whose objects are addressed under `public_url`.
    #[must_use]
    pub fn new(public_url: impl Into<String>) -> Self {
        Self {
            public_url: public_url.into(),
            inner: Mutex::new(Inner::default()),
        }
    }

    /// A small roster with captions and positions, plus a few non-image keys.
    #[must_use]
    pub fn demo(public_url: impl Into<String>) -> Self {
        let store = Self::new(public_url);
        store.insert_with("roster/amy.jpg", 48_211, "Amy, lead vocals", Some(2));
        store.insert_with("roster/ben.png", 51_007, "Ben, bass", Some(0));
        store.insert_with("roster/cara.webp", 39_870, "Cara, drums", Some(1));
        store.insert_with("roster/dev.gif", 12_044, "", None);
        store.insert("roster/notes.txt", 311);
        store.insert("tabs/rock/anthem.pdf", 88_100);
        store.insert("tabs/rock/ballad.pdf", 64_500);
        store.insert("tabs/folk/reel.pdf", 23_900);
        store.insert("index.html", 2_048);
        store
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds an object without metadata.
    pub fn insert(&self, key: &str, size: u64) {
        self.lock().objects.insert(
            key.to_string(),
            StoredObject {
                summary: ObjectSummary::new(key, size),
                metadata: BTreeMap::new(),
            },
        );
    }

    /// Adds an object with a caption and, optionally, a position.
    pub fn insert_with(&self, key: &str, size: u64, caption: &str, position: Option<u32>) {
        let mut metadata = BTreeMap::new();
        if !caption.is_empty() {
            metadata.insert(CAPTION_KEY.to_string(), caption.to_string());
        }
        if let Some(position) = position {
            metadata.insert(POSITION_KEY.to_string(), position.to_string());
        }
        self.lock().objects.insert(
            key.to_string(),
            StoredObject {
                summary: ObjectSummary::new(key, size),
                metadata,
            },
        );
    }

    /// Makes every read and write of `key` fail with HTTP 500.
    pub fn fail_key(&self, key: &str) {
        self.lock().failing_keys.insert(key.to_string());
    }

    /// Lets every key succeed again.
    pub fn clear_failures(&self) {
        self.lock().failing_keys.clear();
    }

    /// Makes listings fail with `error` (or succeed again with `None`).
    pub fn fail_listing(&self, error: Option<TransportError>) {
        self.lock().listing_failure = error;
    }

    /// Metadata as currently stored for `key`.
    #[must_use]
    pub fn metadata(&self, key: &str) -> Option<ItemMetadata> {
        self.lock()
            .objects
            .get(key)
            .map(|object| parse_metadata(&object.metadata))
    }

    /// Raw metadata map stored for `key`.
    #[must_use]
    pub fn raw_metadata(&self, key: &str) -> Option<BTreeMap<String, String>> {
        self.lock()
            .objects
            .get(key)
            .map(|object| object.metadata.clone())
    }

    /// Every successful metadata write, in arrival order.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, ItemMetadata)> {
        self.lock().writes.clone()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        self.lock().objects.keys().cloned().collect()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.lock().objects.contains_key(key)
    }

    /// URL an object is read from.
    #[must_use]
    pub fn url_for(&self, key: &str) -> String {
        join_url(&self.public_url, key)
    }

    fn key_for_url<'a>(&self, url: &'a str) -> &'a str {
        let base = self.public_url.trim_end_matches('/');
        url.strip_prefix(base)
            .and_then(|rest| rest.strip_prefix(KEY_DELIMITER))
            .unwrap_or(url)
    }
}

fn parse_metadata(map: &BTreeMap<String, String>) -> ItemMetadata {
    ItemMetadata {
        caption: map.get(CAPTION_KEY).cloned().unwrap_or_default(),
        position: map
            .get(POSITION_KEY)
            .and_then(|raw| Position::parse(raw))
            .unwrap_or_default(),
    }
}

fn injected_failure(key: &str) -> TransportError {
    TransportError::Http {
        status: 500,
        message: format!("injected failure for {key}"),
    }
}

fn not_found(key: &str) -> TransportError {
    TransportError::Http {
        status: 404,
        message: format!("no such key: {key}"),
    }
}

#[async_trait]
impl ObjectLister for MemoryStore {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<ObjectSummary>, TransportError> {
        let inner = self.lock();
        if let Some(error) = &inner.listing_failure {
            return Err(error.clone());
        }
        Ok(inner
            .objects
            .values()
            .filter(|object| object.summary.key.starts_with(prefix))
            .map(|object| object.summary.clone())
            .collect())
    }
}

#[async_trait]
impl MetadataReader for MemoryStore {
    async fn read_metadata(&self, url: &str) -> Result<ItemMetadata, TransportError> {
        let key = self.key_for_url(url);
        let inner = self.lock();
        if inner.failing_keys.contains(key) {
            return Err(injected_failure(key));
        }
        inner
            .objects
            .get(key)
            .map(|object| parse_metadata(&object.metadata))
            .ok_or_else(|| not_found(key))
    }
}

#[async_trait]
impl MetadataWriter for MemoryStore {
    async fn write_metadata(
        &self,
        key: &str,
        metadata: &ItemMetadata,
    ) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if inner.failing_keys.contains(key) {
            return Err(injected_failure(key));
        }
        let object = inner.objects.get_mut(key).ok_or_else(|| not_found(key))?;
        object.metadata.extend(metadata.to_remote_map());
        inner.writes.push((key.to_string(), metadata.clone()));
        Ok(())
    }
}

#[async_trait]
impl AdminApi for MemoryStore {
    async fn presign_upload(&self, request: &UploadRequest) -> Result<PresignedPost, TransportError> {
        let key = if request.file_name.to_lowercase().ends_with(ARCHIVE_EXTENSION) {
            format!("{ARCHIVE_FOLDER}{KEY_DELIMITER}{}", request.file_name)
        } else {
            [
                request.folder_prefix.as_deref().unwrap_or_default(),
                request.folder_name.as_str(),
                request.file_name.as_str(),
            ]
            .iter()
            .map(|part| part.trim_matches(KEY_DELIMITER))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/")
        };
        let mut fields = request.extra.clone();
        fields.insert(KEY_FIELD.to_string(), key);
        Ok(PresignedPost {
            url: UPLOAD_URL.to_string(),
            fields,
        })
    }

    async fn upload(&self, post: &PresignedPost, file: UploadFile) -> Result<(), TransportError> {
        let key = post
            .fields
            .get(KEY_FIELD)
            .cloned()
            .ok_or_else(|| TransportError::Decode("presigned post has no key".to_string()))?;
        let metadata = post
            .fields
            .iter()
            .filter(|(name, _)| name.as_str() != KEY_FIELD)
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        let mut summary = ObjectSummary::new(key.clone(), file.size());
        summary.last_modified = Some(Utc::now());
        self.lock()
            .objects
            .insert(key, StoredObject { summary, metadata });
        Ok(())
    }

    async fn delete_folder(&self, folder: &str) -> Result<DeleteFolderReport, TransportError> {
        let prefix = format!("{}{KEY_DELIMITER}", folder.trim_end_matches(KEY_DELIMITER));
        let mut inner = self.lock();
        let before = inner.objects.len();
        inner.objects.retain(|key, _| !key.starts_with(&prefix));
        Ok(DeleteFolderReport {
            deleted_files: (before - inner.objects.len()) as u64,
        })
    }

    async fn delete_files(&self, files: &[String]) -> Result<DeleteFilesReport, TransportError> {
        let mut inner = self.lock();
        let mut report = DeleteFilesReport::default();
        for file in files {
            if inner.failing_keys.contains(file) {
                report.errors.push(format!("{file}: injected failure"));
            } else if inner.objects.remove(file).is_some() {
                report.deleted_files += 1;
            } else {
                report.errors.push(format!("{file}: not found"));
            }
        }
        Ok(report)
    }

    async fn update_metadata(
        &self,
        _bucket: &str,
        key: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<(), TransportError> {
        let mut inner = self.lock();
        if inner.failing_keys.contains(key) {
            return Err(injected_failure(key));
        }
        let object = inner.objects.get_mut(key).ok_or_else(|| not_found(key))?;
        object
            .metadata
            .extend(metadata.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(())
    }
}
