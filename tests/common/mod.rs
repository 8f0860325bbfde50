//! Helpers for integration tests.
#![allow(dead_code)]

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use diesel_migrations::MigrationHarness;
use pushkind_storefront::db::{DbPool, MIGRATIONS, establish_connection_pool};
use pushkind_storefront::domain::types::{DisplayName, ImageUrl, RemoteId};
use pushkind_storefront::media::{MediaFile, MediaStore, MediaStoreError, StoredMedia};
use pushkind_storefront::models::config::{MediaStoreConfig, ServerConfig};
use tempfile::NamedTempFile;

/// Temporary database used in integration tests.
pub struct TestDb {
    _tempfile: NamedTempFile,
    pool: DbPool,
}

impl TestDb {
    pub fn new() -> Self {
        let tempfile = NamedTempFile::new().expect("Failed to create temp file");
        let pool = establish_connection_pool(tempfile.path().to_str().unwrap())
            .expect("Failed to establish SQLite connection.");
        let mut conn = pool
            .get()
            .expect("Failed to get SQLite connection from pool.");
        conn.run_pending_migrations(MIGRATIONS)
            .expect("Migrations failed");
        TestDb {
            _tempfile: tempfile,
            pool,
        }
    }

    pub fn pool(&self) -> DbPool {
        self.pool.clone()
    }
}

pub fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: ":memory:".to_string(),
        environment: "test".to_string(),
        media_store: MediaStoreConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "storefront".to_string(),
            api_url: "https://media.invalid/v1_1".to_string(),
        },
    }
}

/// Media store keeping uploaded objects in memory.
///
/// Remote ids carry a sequence number that is never reused, even after the
/// object is deleted.
#[derive(Default)]
pub struct MemoryMediaStore {
    objects: Mutex<Vec<String>>,
    uploads: AtomicUsize,
    uploads_fail: Mutex<bool>,
    fail_deletes: bool,
}

impl MemoryMediaStore {
    pub fn failing_deletes() -> Self {
        Self {
            fail_deletes: true,
            ..Default::default()
        }
    }

    /// Make every following upload fail.
    pub fn fail_uploads(&self) {
        *self.uploads_fail.lock().unwrap() = true;
    }

    pub fn objects(&self) -> Vec<String> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaStore for MemoryMediaStore {
    async fn upload(
        &self,
        file: &MediaFile,
        name_hint: &str,
    ) -> Result<StoredMedia, MediaStoreError> {
        if *self.uploads_fail.lock().unwrap() {
            return Err(MediaStoreError::Upload("service unavailable".to_string()));
        }
        let sequence = self.uploads.fetch_add(1, Ordering::SeqCst);
        let remote_id = format!("storefront/{name_hint}_{sequence}");
        self.objects.lock().unwrap().push(remote_id.clone());
        let original_name = file.file_name.clone().unwrap_or_else(|| name_hint.to_string());
        Ok(StoredMedia {
            url: ImageUrl::new(format!("https://media.example.com/{remote_id}.png")).unwrap(),
            remote_id: RemoteId::new(remote_id).unwrap(),
            original_name: DisplayName::new(original_name).unwrap(),
        })
    }

    async fn delete(&self, remote_id: &RemoteId) -> Result<(), MediaStoreError> {
        if self.fail_deletes {
            return Err(MediaStoreError::Delete("unreachable".to_string()));
        }
        let mut objects = self.objects.lock().unwrap();
        match objects.iter().position(|o| o == remote_id.as_str()) {
            Some(position) => {
                objects.remove(position);
                Ok(())
            }
            None => Err(MediaStoreError::Delete(format!("{remote_id} not found"))),
        }
    }
}

/// Encode text fields and file parts as a `multipart/form-data` body,
/// returning the content type header value and the body.
pub fn multipart_body(
    parts: &[(&str, &str, &str, &[u8])],
    text: &[(&str, &str)],
) -> (String, Vec<u8>) {
    let boundary = "storefront-test-boundary";
    let mut body = Vec::new();
    for (name, value) in text {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
        );
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    for (field, file_name, content_type, bytes) in parts {
        body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={boundary}"), body)
}
