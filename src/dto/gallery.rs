use chrono::NaiveDateTime;
use serde::Serialize;

use crate::domain::media_asset::MediaAsset;
use crate::services::gallery::{BulkDeleteReport, BulkUploadReport, DeleteFailure, UploadFailure};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaAssetDto {
    pub id: i32,
    pub url: String,
    pub display_name: String,
    pub remote_id: Option<String>,
    pub created_at: NaiveDateTime,
}

impl From<MediaAsset> for MediaAssetDto {
    fn from(value: MediaAsset) -> Self {
        Self {
            id: value.id.get(),
            url: value.url.into_inner(),
            display_name: value.display_name.into_inner(),
            remote_id: value.remote_id.map(|r| r.into_inner()),
            created_at: value.created_at,
        }
    }
}

/// Single upload: the stored row is inlined next to the envelope fields.
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub image: MediaAssetDto,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkUploadResponse {
    pub success: bool,
    pub uploaded_count: usize,
    pub failed_count: usize,
    pub images: Vec<MediaAssetDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<UploadFailure>>,
    pub message: String,
}

impl From<BulkUploadReport> for BulkUploadResponse {
    fn from(value: BulkUploadReport) -> Self {
        let uploaded_count = value.succeeded.len();
        Self {
            success: true,
            uploaded_count,
            failed_count: value.failed.len(),
            images: value.succeeded.into_iter().map(MediaAssetDto::from).collect(),
            errors: (!value.failed.is_empty()).then_some(value.failed),
            message: format!("Successfully uploaded {uploaded_count} image(s)"),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResponse {
    pub success: bool,
    pub deleted_count: usize,
    pub failed_count: usize,
    pub deleted_ids: Vec<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<DeleteFailure>>,
    pub message: String,
}

impl From<BulkDeleteReport> for BulkDeleteResponse {
    fn from(value: BulkDeleteReport) -> Self {
        let deleted_count = value.deleted.len();
        Self {
            success: true,
            deleted_count,
            failed_count: value.failed.len(),
            deleted_ids: value.deleted.into_iter().map(|id| id.get()).collect(),
            errors: (!value.failed.is_empty()).then_some(value.failed),
            message: format!("Successfully deleted {deleted_count} image(s)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::MediaAssetId;
    use serde_json::json;

    #[test]
    fn bulk_delete_response_uses_camel_case_and_omits_empty_errors() {
        let report = BulkDeleteReport {
            deleted: vec![MediaAssetId::new(1).unwrap()],
            failed: vec![],
        };

        let body = serde_json::to_value(BulkDeleteResponse::from(report)).unwrap();

        assert_eq!(
            body,
            json!({
                "success": true,
                "deletedCount": 1,
                "failedCount": 0,
                "deletedIds": [1],
                "message": "Successfully deleted 1 image(s)"
            })
        );
    }

    #[test]
    fn bulk_upload_response_lists_failures_by_index() {
        let report = BulkUploadReport {
            succeeded: vec![],
            failed: vec![UploadFailure {
                index: 2,
                message: "upload failed".to_string(),
            }],
        };

        let body = serde_json::to_value(BulkUploadResponse::from(report)).unwrap();

        assert_eq!(body["uploadedCount"], 0);
        assert_eq!(body["failedCount"], 1);
        assert_eq!(body["errors"][0]["index"], 2);
    }
}
