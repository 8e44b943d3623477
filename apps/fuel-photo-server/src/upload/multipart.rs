//! Multipart intake
//!
//! Streams the named photo fields of a request into temporary files.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartError, MultipartRejection};
use axum::extract::Multipart;
use tokio::io::AsyncWriteExt;

use super::temp_file::TempImage;
use super::types::{ImageRole, PhotoSet, PhotoSetBuilder, UploadError, UploadedImage};

impl From<MultipartError> for UploadError {
    fn from(e: MultipartError) -> Self {
        UploadError::Multipart {
            status: e.status(),
            message: e.body_text(),
        }
    }
}

impl From<MultipartRejection> for UploadError {
    fn from(rejection: MultipartRejection) -> Self {
        UploadError::Multipart {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Read all four photos from a multipart body.
///
/// Fields with other names are skipped. Files already written are removed if
/// the body turns out to be incomplete or malformed.
pub async fn read_photo_set(
    mut multipart: Multipart,
    temp_dir: &Path,
) -> Result<PhotoSet, UploadError> {
    let mut builder = PhotoSetBuilder::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        let Some(role) = ImageRole::from_field_name(&name) else {
            tracing::debug!(field = %name, "Ignoring unexpected multipart field");
            continue;
        };

        if builder.contains(role) {
            return Err(UploadError::DuplicatePart(role));
        }

        let image = write_field(role, field, temp_dir).await?;
        builder.insert(image)?;
    }

    builder.build()
}

async fn write_field(
    role: ImageRole,
    mut field: Field<'_>,
    temp_dir: &Path,
) -> Result<UploadedImage, UploadError> {
    let file_name = field.file_name().map(|s| s.to_string());
    let (temp, mut file) = TempImage::create(temp_dir).await?;

    let mut size = 0u64;
    while let Some(chunk) = field.chunk().await? {
        size += chunk.len() as u64;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    tracing::debug!(
        role = %role,
        file_name = ?file_name,
        size,
        path = %temp.path().display(),
        "Received image"
    );

    Ok(UploadedImage::new(role, temp, size))
}
