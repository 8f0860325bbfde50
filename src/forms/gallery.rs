use actix_multipart::form::{MultipartForm, tempfile::TempFile};
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::forms::{ImageFileError, read_image};
use crate::media::MediaFile;

/// Maximum number of files accepted by a bulk upload.
pub const MAX_BULK_FILES: usize = 20;

#[derive(MultipartForm)]
pub struct UploadImageForm {
    #[multipart(limit = "5MiB")]
    pub image: Option<TempFile>,
}

#[derive(Debug)]
pub struct UploadImagePayload {
    pub file: MediaFile,
}

#[derive(Debug, Error)]
pub enum UploadImageFormError {
    #[error("No image file provided")]
    MissingFile,
    #[error(transparent)]
    File(#[from] ImageFileError),
}

impl TryFrom<UploadImageForm> for UploadImagePayload {
    type Error = UploadImageFormError;

    fn try_from(value: UploadImageForm) -> Result<Self, Self::Error> {
        let file = read_image(value.image)?.ok_or(UploadImageFormError::MissingFile)?;
        Ok(Self { file })
    }
}

#[derive(MultipartForm)]
pub struct BulkUploadForm {
    #[multipart(limit = "5MiB")]
    pub images: Vec<TempFile>,
}

#[derive(Debug)]
pub struct BulkUploadPayload {
    pub files: Vec<MediaFile>,
}

#[derive(Debug, Error)]
pub enum BulkUploadFormError {
    #[error("No image files provided")]
    MissingFiles,
    #[error("At most 20 images can be uploaded at once")]
    TooManyFiles,
    #[error("Image {index}: {source}")]
    File {
        index: usize,
        #[source]
        source: ImageFileError,
    },
}

impl TryFrom<BulkUploadForm> for BulkUploadPayload {
    type Error = BulkUploadFormError;

    /// Validates every part up front so a rejected batch causes no uploads.
    fn try_from(value: BulkUploadForm) -> Result<Self, Self::Error> {
        if value.images.len() > MAX_BULK_FILES {
            return Err(BulkUploadFormError::TooManyFiles);
        }

        let mut files = Vec::with_capacity(value.images.len());
        for (index, image) in value.images.into_iter().enumerate() {
            match read_image(Some(image)) {
                Ok(Some(file)) => files.push(file),
                Ok(None) => {}
                Err(source) => return Err(BulkUploadFormError::File { index, source }),
            }
        }

        if files.is_empty() {
            return Err(BulkUploadFormError::MissingFiles);
        }
        Ok(Self { files })
    }
}

#[derive(Deserialize, Validate)]
pub struct BulkDeleteForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "No image IDs provided"))]
    pub ids: Vec<i32>,
}

/// Ids are kept raw so that non-positive values are reported per item as
/// missing rather than failing the whole batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkDeletePayload {
    pub ids: Vec<i32>,
}

#[derive(Debug, Error)]
pub enum BulkDeleteFormError {
    #[error("Bulk delete form validation failed: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for BulkDeleteFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<BulkDeleteForm> for BulkDeletePayload {
    type Error = BulkDeleteFormError;

    fn try_from(value: BulkDeleteForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self { ids: value.ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bulk_delete_requires_ids() {
        let form = BulkDeleteForm { ids: vec![] };
        let result: Result<BulkDeletePayload, _> = form.try_into();
        assert!(matches!(result, Err(BulkDeleteFormError::Validation(_))));
    }

    #[test]
    fn bulk_delete_keeps_raw_ids() {
        let form = BulkDeleteForm { ids: vec![1, 999, -3] };
        let payload: BulkDeletePayload = form.try_into().unwrap();
        assert_eq!(payload.ids, vec![1, 999, -3]);
    }

    #[test]
    fn missing_image_is_rejected() {
        let form = UploadImageForm { image: None };
        let result: Result<UploadImagePayload, _> = form.try_into();
        assert!(matches!(result, Err(UploadImageFormError::MissingFile)));
    }

    #[test]
    fn empty_bulk_upload_is_rejected() {
        let form = BulkUploadForm { images: vec![] };
        let result: Result<BulkUploadPayload, _> = form.try_into();
        assert!(matches!(result, Err(BulkUploadFormError::MissingFiles)));
    }
}
