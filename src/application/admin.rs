// SPDX-License-Identifier: MPL-2.0
//! Admin use cases: uploads, deletions and metadata updates.
//!
//! Every request is validated here before the [`AdminApi`] port is called,
//! so a rejected request never reaches the network.

use crate::application::port::{
    AdminApi, DeleteFilesReport, DeleteFolderReport, UploadFile, UploadRequest,
};
use crate::config::{ARCHIVE_EXTENSION, MAX_ARCHIVE_UPLOAD_BYTES, MAX_FILE_UPLOAD_BYTES};
use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Validating front of the admin backend.
pub struct AdminConsole {
    api: Arc<dyn AdminApi>,
}

impl AdminConsole {
    #[must_use]
    pub fn new(api: Arc<dyn AdminApi>) -> Self {
        Self { api }
    }

    /// Uploads a `.zip` archive into `folder_name`; the backend unpacks it.
    ///
    /// # Errors
    ///
    /// Validation error for an empty folder name, a non-zip file or a file
    /// above 256 MiB; transport error if presigning or the upload fails.
    pub async fn upload_archive(&self, folder_name: &str, file: UploadFile) -> Result<()> {
        let folder_name = folder_name.trim();
        if folder_name.is_empty() {
            return Err(Error::validation("Please fill in all fields."));
        }
        if !is_archive(&file.name) {
            return Err(Error::validation("Please select a valid .zip file."));
        }
        if file.size() > MAX_ARCHIVE_UPLOAD_BYTES {
            return Err(Error::validation("File size exceeds 256MB limit."));
        }

        let request = UploadRequest {
            folder_name: folder_name.to_string(),
            file_name: file.name.clone(),
            ..UploadRequest::default()
        };
        self.presign_and_upload(&request, file).await
    }

    /// Uploads a single non-archive file.
    ///
    /// `extra` fields travel with the presign request and end up as object
    /// metadata.
    ///
    /// # Errors
    ///
    /// Validation error for an empty folder name, a zip file or a file above
    /// 10 MiB; transport error if presigning or the upload fails.
    pub async fn upload_file(
        &self,
        folder_prefix: Option<&str>,
        folder_name: &str,
        file: UploadFile,
        extra: BTreeMap<String, String>,
    ) -> Result<()> {
        let folder_name = folder_name.trim();
        if folder_name.is_empty() {
            return Err(Error::validation("Please fill in all fields."));
        }
        if is_archive(&file.name) {
            return Err(Error::validation("Please do not select a zip file."));
        }
        if file.size() > MAX_FILE_UPLOAD_BYTES {
            return Err(Error::validation("File size exceeds 10MB limit."));
        }

        let request = UploadRequest {
            folder_name: folder_name.to_string(),
            file_name: file.name.clone(),
            folder_prefix: folder_prefix
                .map(str::trim)
                .filter(|prefix| !prefix.is_empty())
                .map(str::to_string),
            extra,
        };
        self.presign_and_upload(&request, file).await
    }

    async fn presign_and_upload(&self, request: &UploadRequest, file: UploadFile) -> Result<()> {
        let post = self.api.presign_upload(request).await?;
        let size = file.size();
        self.api.upload(&post, file).await?;
        info!(
            folder = %request.folder_name,
            file = %request.file_name,
            size,
            "upload complete"
        );
        Ok(())
    }

    /// Deletes a whole folder.
    ///
    /// # Errors
    ///
    /// Validation error for an empty name; transport error otherwise.
    pub async fn delete_folder(&self, folder_name: &str) -> Result<DeleteFolderReport> {
        let folder_name = folder_name.trim();
        if folder_name.is_empty() {
            return Err(Error::validation("Please enter a folder name."));
        }
        let report = self.api.delete_folder(folder_name).await?;
        info!(folder = folder_name, deleted = report.deleted_files, "folder deleted");
        Ok(report)
    }

    /// Deletes the files listed one per line in `list`.
    ///
    /// # Errors
    ///
    /// Validation error when the list holds no path; transport error
    /// otherwise. Per-file failures are reported in the returned report.
    pub async fn delete_files(&self, list: &str) -> Result<DeleteFilesReport> {
        if list.trim().is_empty() {
            return Err(Error::validation("Please enter file paths to delete."));
        }
        let files = parse_file_list(list);
        if files.is_empty() {
            return Err(Error::validation("No valid file paths provided."));
        }
        let report = self.api.delete_files(&files).await?;
        info!(
            requested = files.len(),
            deleted = report.deleted_files,
            errors = report.errors.len(),
            "files deleted"
        );
        Ok(report)
    }

    /// Merges `metadata` into one object's user metadata.
    ///
    /// # Errors
    ///
    /// Validation error when bucket or key is empty; transport error otherwise.
    pub async fn update_metadata(
        &self,
        bucket: &str,
        key: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<()> {
        let (bucket, key) = (bucket.trim(), key.trim());
        if bucket.is_empty() || key.is_empty() {
            return Err(Error::validation(
                "Bucket name and object key are required.",
            ));
        }
        self.api.update_metadata(bucket, key, metadata).await?;
        info!(bucket, key, "metadata updated");
        Ok(())
    }
}

/// Splits a newline-separated list into trimmed, non-empty paths.
#[must_use]
pub fn parse_file_list(list: &str) -> Vec<String> {
    list.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn is_archive(name: &str) -> bool {
    name.to_lowercase().ends_with(ARCHIVE_EXTENSION)
}

/// Message shown after a folder deletion.
#[must_use]
pub fn folder_summary(folder_name: &str, report: &DeleteFolderReport) -> String {
    format!(
        "Folder \"{folder_name}\" deleted successfully. {} files removed.",
        report.deleted_files
    )
}

/// Message shown after a file deletion, listing per-file errors if any.
#[must_use]
pub fn files_summary(report: &DeleteFilesReport) -> String {
    let mut message = format!("{} file(s) deleted successfully.", report.deleted_files);
    if !report.errors.is_empty() {
        message.push_str(&format!(
            " However, there were some errors: {}",
            report.errors.join(", ")
        ));
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::infrastructure::MemoryStore;

    fn console() -> (Arc<MemoryStore>, AdminConsole) {
        let store = Arc::new(MemoryStore::demo("https://tabs.example.com"));
        (store.clone(), AdminConsole::new(store))
    }

    #[test]
    fn parse_file_list_trims_and_drops_blank_lines() {
        let files = parse_file_list("  roster/a.png \n\n\troster/b.png\n   \n");
        assert_eq!(files, vec!["roster/a.png", "roster/b.png"]);
    }

    #[tokio::test]
    async fn blank_file_list_is_rejected_before_any_call() {
        let (store, console) = console();
        let before = store.keys();

        let err = console.delete_files(" \n \n").await.expect_err("rejected");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(store.keys(), before);
    }

    #[tokio::test]
    async fn delete_files_reports_per_file_errors() {
        let (store, console) = console();
        let report = console
            .delete_files("roster/amy.jpg\nroster/missing.png\n")
            .await
            .expect("delete");

        assert_eq!(report.deleted_files, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!store.contains("roster/amy.jpg"));
        assert!(files_summary(&report).contains("However, there were some errors"));
    }

    #[tokio::test]
    async fn delete_folder_requires_a_name() {
        let (_, console) = console();
        let err = console.delete_folder("  ").await.expect_err("rejected");
        assert_eq!(err.to_string(), "Validation Error: Please enter a folder name.");

        let report = console.delete_folder("roster").await.expect("delete");
        assert_eq!(report.deleted_files, 5);
        assert_eq!(
            folder_summary("roster", &report),
            "Folder \"roster\" deleted successfully. 5 files removed."
        );
    }

    #[tokio::test]
    async fn archive_upload_rules() {
        let (store, console) = console();

        let not_zip = console
            .upload_archive("tabs", UploadFile::new("tabs.tar", vec![1]))
            .await;
        assert!(matches!(not_zip, Err(Error::Validation(_))));

        let too_big = UploadFile::new(
            "tabs.zip",
            vec![0; (MAX_ARCHIVE_UPLOAD_BYTES + 1) as usize],
        );
        assert!(console.upload_archive("tabs", too_big).await.is_err());

        console
            .upload_archive("incoming", UploadFile::new("Tabs.ZIP", vec![0; 8]))
            .await
            .expect("upload");
        assert!(store.contains("uploads/Tabs.ZIP"));
    }

    #[tokio::test]
    async fn file_upload_rejects_archives_and_uses_prefix() {
        let (store, console) = console();

        let zip = console
            .upload_file(None, "roster", UploadFile::new("a.zip", vec![1]), BTreeMap::new())
            .await;
        assert!(matches!(zip, Err(Error::Validation(_))));

        let extra = BTreeMap::from([("caption".to_string(), "Eve".to_string())]);
        console
            .upload_file(
                None,
                "roster",
                UploadFile::new("eve.png", vec![0; 32]),
                extra,
            )
            .await
            .expect("upload");
        assert!(store.contains("roster/eve.png"));
        assert_eq!(
            store.metadata("roster/eve.png").map(|m| m.caption),
            Some("Eve".to_string())
        );
    }

    #[tokio::test]
    async fn update_metadata_requires_bucket_and_key() {
        let (store, console) = console();
        let metadata = BTreeMap::from([("band".to_string(), "The Strings".to_string())]);

        let err = console
            .update_metadata("", "roster/amy.jpg", &metadata)
            .await
            .expect_err("rejected");
        assert_eq!(err.kind(), ErrorKind::Validation);

        console
            .update_metadata("tabs", "roster/amy.jpg", &metadata)
            .await
            .expect("update");
        let raw = store.raw_metadata("roster/amy.jpg").expect("object");
        assert_eq!(raw.get("band").map(String::as_str), Some("The Strings"));
        assert_eq!(raw.get("caption").map(String::as_str), Some("Amy, lead vocals"));
    }
}
