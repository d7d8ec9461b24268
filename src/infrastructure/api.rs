// SPDX-License-Identifier: MPL-2.0
//! JSON client for the admin backend.
//!
//! Routes:
//!
//! | Operation        | Request                                   | Token  |
//! |------------------|-------------------------------------------|--------|
//! | presign upload   | `POST /presigned-url`                     | id     |
//! | delete folder    | `DELETE /folder/<name>`                   | access |
//! | delete files     | `DELETE /file` `{files}`                  | access |
//! | update metadata  | `POST /update-metadata`                   | access |
//!
//! Failed calls answer `{"error": "..."}`; that message becomes the
//! [`TransportError::Http`] message.

use crate::application::port::{
    AdminApi, DeleteFilesReport, DeleteFolderReport, MetadataWriter, PresignedPost,
    TransportError, UploadFile, UploadRequest,
};
use crate::config::Config;
use crate::domain::gallery::ItemMetadata;
use crate::error::Error;
use crate::infrastructure::s3::USER_AGENT;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// Form field carrying the file in a presigned POST.
const FILE_FIELD: &str = "file";

#[derive(Deserialize)]
struct PresignResponse {
    presigned_post: PresignedPost,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Serialize)]
struct DeleteFilesBody<'a> {
    files: &'a [String],
}

#[derive(Serialize)]
struct UpdateMetadataBody<'a> {
    bucket_name: &'a str,
    object_key: &'a str,
    metadata: &'a BTreeMap<String, String>,
}

/// Authenticated client of the backend API.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    endpoint: Url,
    bucket: String,
    access_token: String,
    id_token: String,
}

impl BackendClient {
    /// Creates a client for `endpoint`. Metadata writes target `bucket`.
    ///
    /// # Errors
    ///
    /// Returns a config error for an unparsable endpoint and a transport
    /// error if the HTTP client cannot be built.
    pub fn new(
        endpoint: &str,
        bucket: impl Into<String>,
        access_token: impl Into<String>,
        id_token: impl Into<String>,
    ) -> crate::error::Result<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid api endpoint '{endpoint}': {e}")))?;
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint,
            bucket: bucket.into(),
            access_token: access_token.into(),
            id_token: id_token.into(),
        })
    }

    /// Creates a client from the `[api]` and `[storage]` sections.
    ///
    /// The id token falls back to the access token when absent.
    ///
    /// # Errors
    ///
    /// Returns a config error when the endpoint or the access token is missing.
    pub fn from_config(config: &Config) -> crate::error::Result<Self> {
        let endpoint = config
            .api
            .endpoint
            .as_deref()
            .filter(|endpoint| !endpoint.is_empty())
            .ok_or_else(|| Error::Config("api.endpoint is not set".to_string()))?;
        let access_token = config
            .api
            .access_token
            .clone()
            .ok_or_else(|| Error::Config("Admin privileges required.".to_string()))?;
        let id_token = config
            .api
            .id_token
            .clone()
            .unwrap_or_else(|| access_token.clone());
        Self::new(endpoint, config.storage.bucket.clone(), access_token, id_token)
    }

    /// `<endpoint>/<segments...>`, each segment percent-encoded.
    fn route(&self, segments: &[&str]) -> Result<Url, TransportError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| {
                TransportError::Decode(format!("endpoint {} cannot be a base", self.endpoint))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = ensure_success(request.send().await?).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Maps a non-success answer to [`TransportError::Http`] carrying the
/// backend's `error` message.
async fn ensure_success(response: Response) -> Result<Response, TransportError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| {
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
impl AdminApi for BackendClient {
    async fn presign_upload(&self, request: &UploadRequest) -> Result<PresignedPost, TransportError> {
        let url = self.route(&["presigned-url"])?;
        debug!(%url, file = %request.file_name, "requesting presigned upload");
        let response: PresignResponse = self
            .send_json(
                self.client
                    .post(url)
                    .bearer_auth(&self.id_token)
                    .json(request),
            )
            .await?;
        Ok(response.presigned_post)
    }

    async fn upload(&self, post: &PresignedPost, file: UploadFile) -> Result<(), TransportError> {
        let mut form = Form::new();
        for (name, value) in &post.fields {
            form = form.text(name.clone(), value.clone());
        }
        // The file part must come after every policy field.
        let part = Part::bytes(file.bytes).file_name(file.name);
        form = form.part(FILE_FIELD, part);

        let response = self.client.post(&post.url).multipart(form).send().await?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn delete_folder(&self, folder: &str) -> Result<DeleteFolderReport, TransportError> {
        let url = self.route(&["folder", folder])?;
        self.send_json(self.client.delete(url).bearer_auth(&self.access_token))
            .await
    }

    async fn delete_files(&self, files: &[String]) -> Result<DeleteFilesReport, TransportError> {
        let url = self.route(&["file"])?;
        self.send_json(
            self.client
                .delete(url)
                .bearer_auth(&self.access_token)
                .json(&DeleteFilesBody { files }),
        )
        .await
    }

    async fn update_metadata(
        &self,
        bucket: &str,
        key: &str,
        metadata: &BTreeMap<String, String>,
    ) -> Result<(), TransportError> {
        let url = self.route(&["update-metadata"])?;
        let body = UpdateMetadataBody {
            bucket_name: bucket,
            object_key: key,
            metadata,
        };
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        ensure_success(response).await?;
        Ok(())
    }
}

#[async_trait]
impl MetadataWriter for BackendClient {
    async fn write_metadata(
        &self,
        key: &str,
        metadata: &ItemMetadata,
    ) -> Result<(), TransportError> {
        self.update_metadata(&self.bucket, key, &metadata.to_remote_map())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(endpoint: &str) -> BackendClient {
        BackendClient::new(endpoint, "tabs", "access", "id").expect("client")
    }

    #[test]
    fn routes_encode_folder_names() {
        let client = client("https://api.example.org/prod/");
        let url = client.route(&["folder", "Grateful Dead/live"]).expect("url");
        assert_eq!(
            url.as_str(),
            "https://api.example.org/prod/folder/Grateful%20Dead%2Flive"
        );
    }

    #[test]
    fn routes_without_trailing_slash() {
        let client = client("https://api.example.org/prod");
        let url = client.route(&["presigned-url"]).expect("url");
        assert_eq!(url.as_str(), "https://api.example.org/prod/presigned-url");
    }

    #[test]
    fn invalid_endpoint_is_a_config_error() {
        let result = BackendClient::new("not a url", "tabs", "a", "b");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn from_config_requires_endpoint_and_access_token() {
        let mut config = Config::default();
        assert!(matches!(
            BackendClient::from_config(&config),
            Err(Error::Config(_))
        ));

        config.api.endpoint = Some("https://api.example.org".to_string());
        assert!(BackendClient::from_config(&config).is_err());

        config.api.access_token = Some("token".to_string());
        let client = BackendClient::from_config(&config).expect("client");
        assert_eq!(client.id_token, "token");
        assert_eq!(client.bucket, config.storage.bucket);
    }

    #[test]
    fn upload_request_serializes_extras_inline() {
        let request = UploadRequest {
            folder_name: "Eve".into(),
            file_name: "eve.png".into(),
            folder_prefix: Some("roster".into()),
            extra: BTreeMap::from([("caption".into(), "Eve".into())]),
        };
        let json = serde_json::to_value(&request).expect("json");
        assert_eq!(
            json,
            serde_json::json!({
                "folder_name": "Eve",
                "file_name": "eve.png",
                "folder_prefix": "roster",
                "caption": "Eve"
            })
        );
    }

    #[test]
    fn error_bodies_and_reports_decode() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error": "Folder \"x\" not found"}"#).expect("json");
        assert_eq!(body.error.as_deref(), Some("Folder \"x\" not found"));

        let report: DeleteFilesReport = serde_json::from_str(
            r#"{"message": "Deletion completed.", "deleted_files": 2, "errors": ["a: denied"], "partial_success": true}"#,
        )
        .expect("json");
        assert_eq!(report.deleted_files, 2);
        assert_eq!(report.errors, vec!["a: denied"]);
    }
}
