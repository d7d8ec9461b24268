// SPDX-License-Identifier: MPL-2.0
//! Admin backend port: uploads, deletions and raw metadata updates.
//!
//! Requests reaching this port are already validated by
//! `application::admin`; implementations only move bytes.

use super::TransportError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of a presigned-upload request.
///
/// Extra fields travel alongside the required ones and end up as object
/// metadata on the uploaded file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadRequest {
    pub folder_name: String,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_prefix: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, String>,
}

/// Presigned POST target returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PresignedPost {
    pub url: String,
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
}

/// A file to upload, fully read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    #[must_use]
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Result of deleting a folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteFolderReport {
    #[serde(default)]
    pub deleted_files: u64,
}

/// Result of deleting individual files; `errors` lists per-file failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DeleteFilesReport {
    #[serde(default)]
    pub deleted_files: u64,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Operations of the admin backend.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Asks the backend for a presigned POST target.
    async fn presign_upload(&self, request: &UploadRequest) -> Result<PresignedPost, TransportError>;

    /// Sends `file` to a presigned target.
    async fn upload(&self, post: &PresignedPost, file: UploadFile) -> Result<(), TransportError>;

    /// Deletes every object under `folder`.
    async fn delete_folder(&self, folder: &str) -> Result<DeleteFolderReport, TransportError>;

    /// Deletes the listed object keys.
    async fn delete_files(&self, files: &[String]) -> Result<DeleteFilesReport, TransportError>;

    /// Merges `metadata` into the user metadata of one object.
    async fn update_metadata(
        &self,
        bucket: &str,
        key: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<(), TransportError>;
}
