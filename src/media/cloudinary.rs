//! Cloudinary-compatible upload API client.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::types::{DisplayName, ImageUrl, RemoteId};
use crate::media::{MediaFile, MediaStore, MediaStoreError, StoredMedia, object_key};
use crate::models::config::MediaStoreConfig;

const SIGNATURE_ALGORITHM: &str = "sha256";

/// Successful upload payload.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    original_filename: Option<String>,
}

/// Result of a destroy call; `ok` on success, `not found` otherwise.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for a Cloudinary-style signed upload API.
#[derive(Debug, Clone)]
pub struct CloudinaryClient {
    client: Client,
    config: MediaStoreConfig,
}

impl CloudinaryClient {
    /// Creates a client, rejecting configurations without credentials.
    pub fn new(config: MediaStoreConfig) -> Result<Self, MediaStoreError> {
        for (field, value) in [
            ("cloud_name", &config.cloud_name),
            ("api_key", &config.api_key),
            ("api_secret", &config.api_secret),
        ] {
            if value.trim().is_empty() {
                return Err(MediaStoreError::Config(format!("{field} is not set")));
            }
        }

        Ok(Self {
            client: Client::new(),
            config,
        })
    }

    fn endpoint(&self, resource_type: &str, action: &str) -> String {
        format!(
            "{}/{}/{resource_type}/{action}",
            self.config.api_url.trim_end_matches('/'),
            self.config.cloud_name
        )
    }

    /// Parameters common to every signed call, signature included.
    fn signed_params(&self, mut params: Vec<(&'static str, String)>) -> Vec<(&'static str, String)> {
        params.push(("timestamp", Utc::now().timestamp().to_string()));
        let signature = sign(&params, &self.config.api_secret);
        params.push(("api_key", self.config.api_key.clone()));
        params.push(("signature_algorithm", SIGNATURE_ALGORITHM.to_string()));
        params.push(("signature", signature));
        params
    }
}

/// Signs API parameters: `k=v` pairs sorted by key and joined with `&`,
/// followed by the API secret, hashed with SHA-256.
fn sign(params: &[(&str, String)], api_secret: &str) -> String {
    let mut sorted = params.iter().collect::<Vec<_>>();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let payload = sorted
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ErrorResponse>(&body) {
        Ok(parsed) => format!("{status}: {}", parsed.error.message),
        Err(_) => format!("{status}: {body}"),
    }
}

#[async_trait]
impl MediaStore for CloudinaryClient {
    async fn upload(
        &self,
        file: &MediaFile,
        name_hint: &str,
    ) -> Result<StoredMedia, MediaStoreError> {
        let key = object_key(name_hint, Utc::now());
        let params = self.signed_params(vec![
            ("folder", self.config.folder.clone()),
            ("overwrite", "true".to_string()),
            ("public_id", key.clone()),
        ]);

        let mut part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone().unwrap_or_else(|| key.clone()));
        if let Some(content_type) = &file.content_type {
            part = part
                .mime_str(content_type)
                .map_err(|e| MediaStoreError::Upload(format!("invalid content type: {e}")))?;
        }

        let mut form = Form::new().part("file", part);
        for (name, value) in params {
            form = form.text(name, value);
        }

        log::debug!("Uploading {} bytes as {key}", file.bytes.len());

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| MediaStoreError::Upload(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MediaStoreError::Upload(error_message(response).await));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::Upload(format!("unexpected response: {e}")))?;

        let original_name = uploaded
            .original_filename
            .filter(|name| !name.trim().is_empty())
            .or_else(|| file.file_name.clone())
            .unwrap_or(key);

        Ok(StoredMedia {
            url: ImageUrl::new(uploaded.secure_url)
                .map_err(|e| MediaStoreError::Upload(e.to_string()))?,
            remote_id: RemoteId::new(uploaded.public_id)
                .map_err(|e| MediaStoreError::Upload(e.to_string()))?,
            original_name: DisplayName::new(original_name)
                .map_err(|e| MediaStoreError::Upload(e.to_string()))?,
        })
    }

    async fn delete(&self, remote_id: &RemoteId) -> Result<(), MediaStoreError> {
        let params = self.signed_params(vec![("public_id", remote_id.as_str().to_string())]);

        let response = self
            .client
            .post(self.endpoint("image", "destroy"))
            .form(&params)
            .send()
            .await
            .map_err(|e| MediaStoreError::Delete(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(MediaStoreError::Delete(error_message(response).await));
        }

        let destroyed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| MediaStoreError::Delete(format!("unexpected response: {e}")))?;

        match destroyed.result.as_str() {
            "ok" => Ok(()),
            other => Err(MediaStoreError::Delete(format!("{remote_id}: {other}"))),
        }
    }
}
