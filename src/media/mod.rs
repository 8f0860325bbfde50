//! Remote image hosting.
//!
//! The [`MediaStore`] trait is the seam between the upload orchestration in
//! `services` and the vendor API; [`cloudinary::CloudinaryClient`] is the
//! production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::types::{DisplayName, ImageUrl, RemoteId};

pub mod cloudinary;

/// Errors returned by media store implementations.
#[derive(Debug, Error)]
pub enum MediaStoreError {
    /// The object could not be stored (network, auth or service failure).
    #[error("upload failed: {0}")]
    Upload(String),
    /// The object could not be removed or does not exist.
    #[error("delete failed: {0}")]
    Delete(String),
    /// The client is missing credentials or has an unusable endpoint.
    #[error("media store misconfigured: {0}")]
    Config(String),
}

/// Uploaded file buffered in memory before it is sent to the media store.
#[derive(Debug, Clone)]
pub struct MediaFile {
    pub bytes: Vec<u8>,
    /// File name supplied by the client, if any.
    pub file_name: Option<String>,
    /// MIME essence supplied by the client, e.g. `image/png`.
    pub content_type: Option<String>,
}

impl MediaFile {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            file_name: None,
            content_type: None,
        }
    }

    pub fn file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Location of an object after a confirmed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredMedia {
    pub url: ImageUrl,
    pub remote_id: RemoteId,
    pub original_name: DisplayName,
}

/// Trait for remote image hosting backends.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Store `file` under a key derived from `name_hint` and return its
    /// public location.
    async fn upload(&self, file: &MediaFile, name_hint: &str)
    -> Result<StoredMedia, MediaStoreError>;

    /// Remove a previously uploaded object.
    async fn delete(&self, remote_id: &RemoteId) -> Result<(), MediaStoreError>;
}

/// Build the object key for an upload.
///
/// Whitespace runs in the hint become `_` and the millisecond timestamp is
/// appended to keep unrelated uploads sharing a name apart. Two requests in
/// the same millisecond with the same hint still collide.
pub fn object_key(name_hint: &str, now: DateTime<Utc>) -> String {
    let hint = name_hint.split_whitespace().collect::<Vec<_>>().join("_");
    let hint = if hint.is_empty() { "upload" } else { &hint };
    format!("{hint}_{}", now.timestamp_millis())
}

/// Result of the best-effort remote phase of a delete or replace.
///
/// Never turned into an error: the database row is authoritative and a
/// failed remote delete only leaves an orphaned object behind.
#[derive(Debug)]
pub enum Cleanup {
    /// There was no remote object to remove.
    NotNeeded,
    /// The remote object was removed.
    Removed,
    /// Removal failed; the object may be orphaned.
    Failed(MediaStoreError),
}

impl Cleanup {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Delete `remote_id` from the store, logging and absorbing any failure.
pub async fn remove_best_effort<S>(store: &S, remote_id: Option<&RemoteId>) -> Cleanup
where
    S: MediaStore + ?Sized,
{
    let Some(remote_id) = remote_id else {
        return Cleanup::NotNeeded;
    };

    match store.delete(remote_id).await {
        Ok(()) => {
            log::info!("Removed remote object {remote_id}");
            Cleanup::Removed
        }
        Err(e) => {
            log::warn!("Failed to remove remote object {remote_id}: {e}");
            Cleanup::Failed(e)
        }
    }
}
