use std::io::{Read, Seek, SeekFrom};

use actix_multipart::form::tempfile::TempFile;
use thiserror::Error;

use crate::media::MediaFile;

pub mod categories;
pub mod gallery;
pub mod products;

/// MIME essences accepted for uploaded images.
pub const ALLOWED_IMAGE_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/webp", "image/gif"];

/// Per-file upload limit in bytes.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum ImageFileError {
    #[error("Only image files are allowed (jpeg, png, webp, gif)")]
    UnsupportedType,
    #[error("Image exceeds the 5MB limit")]
    TooLarge,
    #[error("Failed to read uploaded image: {0}")]
    Read(#[from] std::io::Error),
}

/// Buffer an uploaded part into memory after checking its type and size.
///
/// Returns `Ok(None)` for the empty, nameless part browsers submit when no
/// file was chosen.
pub fn read_image(file: Option<TempFile>) -> Result<Option<MediaFile>, ImageFileError> {
    let Some(mut file) = file else {
        return Ok(None);
    };
    let file_name = file.file_name.take().filter(|name| !name.trim().is_empty());
    if file.size == 0 && file_name.is_none() {
        return Ok(None);
    }

    let content_type = file
        .content_type
        .as_ref()
        .map(|mime| mime.essence_str().to_string())
        .filter(|essence| ALLOWED_IMAGE_TYPES.contains(&essence.as_str()))
        .ok_or(ImageFileError::UnsupportedType)?;

    if file.size > MAX_IMAGE_BYTES {
        return Err(ImageFileError::TooLarge);
    }

    let handle = file.file.as_file_mut();
    handle.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::with_capacity(file.size);
    handle.read_to_end(&mut bytes)?;

    let media = MediaFile::new(bytes).content_type(content_type);
    Ok(Some(match file_name {
        Some(name) => media.file_name(name),
        None => media,
    }))
}
