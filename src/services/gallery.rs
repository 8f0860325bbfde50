//! Gallery upload and delete orchestration.
//!
//! Uploads confirm the remote write before the row is inserted. Deletes
//! treat the database row as authoritative: the remote object is removed
//! best-effort first and the row goes regardless of that outcome.

use chrono::Utc;
use serde::Serialize;

use crate::domain::media_asset::{MediaAsset, NewMediaAsset};
use crate::domain::types::MediaAssetId;
use crate::forms::gallery::{BulkDeletePayload, BulkUploadPayload, UploadImagePayload};
use crate::media::{Cleanup, MediaFile, MediaStore, remove_best_effort};
use crate::repository::{MediaAssetReader, MediaAssetWriter};

use super::{ServiceError, ServiceResult, WithCleanup};

/// Per-file failure of a bulk upload, keyed by the file's position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadFailure {
    pub index: usize,
    pub message: String,
}

/// Per-id failure of a bulk delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteFailure {
    pub id: i32,
    pub message: String,
}

/// Outcome of a bulk upload. Partial success is not an error.
#[derive(Debug, Default)]
pub struct BulkUploadReport {
    pub succeeded: Vec<MediaAsset>,
    pub failed: Vec<UploadFailure>,
}

/// Outcome of a bulk delete. Partial success is not an error.
#[derive(Debug, Default)]
pub struct BulkDeleteReport {
    pub deleted: Vec<MediaAssetId>,
    pub failed: Vec<DeleteFailure>,
}

pub fn list_images<R>(repo: &R) -> ServiceResult<Vec<MediaAsset>>
where
    R: MediaAssetReader,
{
    repo.list_media_assets().map_err(|e| {
        log::error!("Failed to list gallery images: {e}");
        ServiceError::from(e)
    })
}

/// Uploads one file and records it as a gallery asset.
///
/// A media store failure returns [`ServiceError::Upload`] without touching
/// the database. If the insert fails after a successful upload, the new
/// remote object is removed best-effort before the error is returned.
pub async fn upload_image<R, S>(
    payload: UploadImagePayload,
    repo: &R,
    store: &S,
) -> ServiceResult<MediaAsset>
where
    R: MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    let hint = format!("gallery_{}", Utc::now().timestamp_millis());
    store_and_record(&payload.file, &hint, repo, store).await
}

/// Uploads each file in turn. A failure on one file is recorded with its
/// index and does not stop the remaining files.
pub async fn upload_images<R, S>(
    payload: BulkUploadPayload,
    repo: &R,
    store: &S,
) -> ServiceResult<BulkUploadReport>
where
    R: MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    if payload.files.is_empty() {
        return Err(ServiceError::Form("No image files provided".to_string()));
    }

    let millis = Utc::now().timestamp_millis();
    let mut report = BulkUploadReport::default();
    for (index, file) in payload.files.iter().enumerate() {
        let hint = format!("gallery_{millis}_{index}");
        match store_and_record(file, &hint, repo, store).await {
            Ok(asset) => report.succeeded.push(asset),
            Err(e) => report.failed.push(UploadFailure {
                index,
                message: e.to_string(),
            }),
        }
    }

    log::info!(
        "Bulk upload finished: {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );
    Ok(report)
}

async fn store_and_record<R, S>(
    file: &MediaFile,
    hint: &str,
    repo: &R,
    store: &S,
) -> ServiceResult<MediaAsset>
where
    R: MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    if file.is_empty() {
        return Err(ServiceError::Form("Uploaded image is empty".to_string()));
    }

    let stored = store.upload(file, hint).await.map_err(|e| {
        log::error!("Failed to upload gallery image: {e}");
        ServiceError::from(e)
    })?;

    let new_asset = NewMediaAsset {
        url: stored.url.into(),
        display_name: stored.original_name,
        remote_id: Some(stored.remote_id.clone()),
        created_at: Utc::now().naive_utc(),
    };

    match repo.create_media_asset(&new_asset) {
        Ok(asset) => {
            log::info!("Uploaded gallery image {} as {}", asset.id, stored.remote_id);
            Ok(asset)
        }
        Err(e) => {
            log::error!("Failed to record uploaded gallery image: {e}");
            remove_best_effort(store, Some(&stored.remote_id)).await;
            Err(ServiceError::from(e))
        }
    }
}

/// Deletes a gallery asset and, best-effort, its remote object.
pub async fn delete_image<R, S>(
    image_id: i32,
    repo: &R,
    store: &S,
) -> ServiceResult<WithCleanup<MediaAssetId>>
where
    R: MediaAssetReader + MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    let image_id = MediaAssetId::new(image_id).map_err(|_| ServiceError::NotFound)?;

    let asset = match repo.get_media_asset_by_id(image_id) {
        Ok(Some(asset)) => asset,
        Ok(None) => return Err(ServiceError::NotFound),
        Err(e) => {
            log::error!("Failed to get gallery image: {e}");
            return Err(ServiceError::from(e));
        }
    };

    let cleanup = remove_asset(asset, repo, store).await?;
    Ok(WithCleanup::new(image_id, cleanup))
}

/// Deletes each id in turn. Missing ids are reported and skipped; the
/// batch never aborts.
pub async fn delete_images<R, S>(
    payload: BulkDeletePayload,
    repo: &R,
    store: &S,
) -> ServiceResult<BulkDeleteReport>
where
    R: MediaAssetReader + MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    if payload.ids.is_empty() {
        return Err(ServiceError::Form("No image IDs provided".to_string()));
    }

    let mut report = BulkDeleteReport::default();
    for id in payload.ids {
        let found = match MediaAssetId::new(id) {
            Ok(asset_id) => repo.get_media_asset_by_id(asset_id),
            Err(_) => Ok(None),
        };

        let asset = match found {
            Ok(Some(asset)) => asset,
            Ok(None) => {
                report.failed.push(DeleteFailure {
                    id,
                    message: "Image not found".to_string(),
                });
                continue;
            }
            Err(e) => {
                log::error!("Failed to get gallery image {id}: {e}");
                report.failed.push(DeleteFailure {
                    id,
                    message: ServiceError::from(e).to_string(),
                });
                continue;
            }
        };

        let asset_id = asset.id;
        match remove_asset(asset, repo, store).await {
            Ok(_) => report.deleted.push(asset_id),
            Err(e) => report.failed.push(DeleteFailure {
                id,
                message: e.to_string(),
            }),
        }
    }

    log::info!(
        "Bulk delete finished: {} deleted, {} failed",
        report.deleted.len(),
        report.failed.len()
    );
    Ok(report)
}

async fn remove_asset<R, S>(asset: MediaAsset, repo: &R, store: &S) -> ServiceResult<Cleanup>
where
    R: MediaAssetWriter,
    S: MediaStore + ?Sized,
{
    let cleanup = remove_best_effort(store, asset.remote_id.as_ref()).await;

    match repo.delete_media_asset(asset.id) {
        Ok(_) => {
            log::info!("Deleted gallery image {}", asset.id);
            Ok(cleanup)
        }
        Err(e) => {
            log::error!("Failed to delete gallery image {}: {e}", asset.id);
            Err(ServiceError::from(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{AssetUrl, DisplayName, RemoteId};
    use crate::media::test::TestMediaStore;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn png(name: &str) -> MediaFile {
        let mut bytes = b"\x89PNG\r\n".to_vec();
        bytes.resize(2048, 0);
        MediaFile::new(bytes)
            .file_name(name)
            .content_type("image/png")
    }

    fn sample_asset(id: i32, remote_id: Option<&str>) -> MediaAsset {
        MediaAsset {
            id: MediaAssetId::new(id).unwrap(),
            url: AssetUrl::new(format!("https://media.example.com/{id}.png")).unwrap(),
            display_name: DisplayName::new(format!("image-{id}.png")).unwrap(),
            remote_id: remote_id.map(|r| RemoteId::new(r).unwrap()),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    fn single(file: MediaFile) -> UploadImagePayload {
        UploadImagePayload { file }
    }

    #[actix_web::test]
    async fn upload_records_one_row_matching_the_remote_object() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default();

        let asset = upload_image(single(png("logo.png")), &repo, &store)
            .await
            .unwrap();

        let rows = repo.assets();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], asset);
        assert_eq!(asset.display_name.as_str(), "logo.png");
        assert_eq!(asset.remote_id.as_ref(), store.live().first());
        assert!(asset.url.as_str().contains(store.live()[0].as_str()));
        assert!(store.journal()[0].starts_with("upload:gallery_"));
    }

    #[actix_web::test]
    async fn failed_upload_writes_nothing() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default().failing_uploads();

        let result = upload_image(single(png("logo.png")), &repo, &store).await;

        assert!(matches!(result, Err(ServiceError::Upload(_))));
        assert!(repo.assets().is_empty());
    }

    #[actix_web::test]
    async fn empty_payload_is_rejected_before_upload() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default();

        let result = upload_image(single(MediaFile::new(Vec::new())), &repo, &store).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
        assert!(store.journal().is_empty());
    }

    #[actix_web::test]
    async fn failed_insert_removes_the_fresh_remote_object() {
        let repo = TestRepository::default().failing_writes();
        let store = TestMediaStore::default();

        let result = upload_image(single(png("logo.png")), &repo, &store).await;

        assert!(matches!(result, Err(ServiceError::Database(_))));
        assert!(repo.assets().is_empty());
        assert!(store.live().is_empty());
        assert_eq!(store.deleted().len(), 1);
    }

    #[actix_web::test]
    async fn bulk_upload_continues_past_failures() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default().failing_upload_at(1);
        let files = vec![png("a.png"), png("b.png"), MediaFile::new(Vec::new()), png("d.png")];
        let total = files.len();

        let report = upload_images(BulkUploadPayload { files }, &repo, &store)
            .await
            .unwrap();

        assert_eq!(report.succeeded.len(), 2);
        assert_eq!(report.failed.len(), total - 2);
        assert_eq!(
            report.failed.iter().map(|f| f.index).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(report.failed.iter().all(|f| f.index < total));
        assert_eq!(repo.assets().len(), 2);
        assert!(store.journal().iter().all(|entry| entry.contains("gallery_")));
    }

    #[actix_web::test]
    async fn bulk_upload_rejects_empty_batch() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default();

        let result = upload_images(BulkUploadPayload { files: vec![] }, &repo, &store).await;

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[actix_web::test]
    async fn delete_removes_row_even_when_remote_delete_fails() {
        let repo = TestRepository::new(vec![], vec![], vec![sample_asset(1, Some("orphan"))]);
        let store = TestMediaStore::default().failing_deletes();

        let removed = delete_image(1, &repo, &store).await.unwrap();

        assert_eq!(removed.value.get(), 1);
        assert!(removed.cleanup.is_failed());
        assert!(repo.assets().is_empty());
    }

    #[actix_web::test]
    async fn delete_without_remote_id_skips_the_store() {
        let repo = TestRepository::new(vec![], vec![], vec![sample_asset(1, None)]);
        let store = TestMediaStore::default();

        let removed = delete_image(1, &repo, &store).await.unwrap();

        assert!(matches!(removed.cleanup, Cleanup::NotNeeded));
        assert!(store.journal().is_empty());
    }

    #[actix_web::test]
    async fn deleting_twice_reports_not_found() {
        let repo = TestRepository::default();
        let store = TestMediaStore::default();
        let asset = upload_image(single(png("logo.png")), &repo, &store)
            .await
            .unwrap();

        let first = delete_image(asset.id.get(), &repo, &store).await.unwrap();
        assert!(matches!(first.cleanup, Cleanup::Removed));

        let second = delete_image(asset.id.get(), &repo, &store).await;
        assert_eq!(second.unwrap_err(), ServiceError::NotFound);
    }

    #[actix_web::test]
    async fn bulk_delete_reports_missing_ids_and_keeps_going() {
        let repo = TestRepository::new(
            vec![],
            vec![],
            vec![sample_asset(1, Some("a")), sample_asset(2, None)],
        );
        let store = TestMediaStore::default().failing_deletes();

        let report = delete_images(
            BulkDeletePayload {
                ids: vec![1, 999, 0, 2],
            },
            &repo,
            &store,
        )
        .await
        .unwrap();

        assert_eq!(
            report.deleted.iter().map(|id| id.get()).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert_eq!(
            report.failed,
            vec![
                DeleteFailure {
                    id: 999,
                    message: "Image not found".to_string()
                },
                DeleteFailure {
                    id: 0,
                    message: "Image not found".to_string()
                },
            ]
        );
        assert!(repo.assets().is_empty());
    }

    #[test]
    fn lists_newest_first() {
        let repo = TestRepository::new(
            vec![],
            vec![],
            vec![sample_asset(1, None), sample_asset(2, None)],
        );

        let images = list_images(&repo).unwrap();

        assert_eq!(
            images.iter().map(|a| a.id.get()).collect::<Vec<_>>(),
            vec![2, 1]
        );
    }
}
