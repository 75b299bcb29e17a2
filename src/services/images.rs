use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::image::{DisplayHandle, ImageDataUrl, PurchaseImage};

/// 5 MiB
pub const MAX_IMAGE_SIZE_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum SelectImageError {
    #[error("Please check the consent box before uploading an image.")]
    ConsentRequired,

    #[error("Image is larger than 5 MB. Please choose a smaller file.")]
    TooLarge(u64),

    #[error("Unsupported image type '{0}'. Use JPG, PNG or WEBP.")]
    UnsupportedType(String),

    #[error("Could not read the image '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub struct SelectImageParameters {
    pub path: PathBuf,
    pub consent: bool,
}

fn mime_type_for(path: &Path) -> Result<&'static str, SelectImageError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => Ok("image/png"),
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "webp" => Ok("image/webp"),
        _ => Err(SelectImageError::UnsupportedType(extension)),
    }
}

/// Reads an image file into an inline payload and acquires its display handle
pub fn select_image(parameters: SelectImageParameters) -> Result<PurchaseImage, SelectImageError> {
    if !parameters.consent {
        return Err(SelectImageError::ConsentRequired);
    }

    let path = parameters.path;
    let mime_type = mime_type_for(&path)?;

    let read_failed = |e| SelectImageError::ReadFailed {
        path: path.clone(),
        source: e,
    };

    let size_bytes = std::fs::metadata(&path).map_err(read_failed)?.len();
    if size_bytes > MAX_IMAGE_SIZE_BYTES {
        return Err(SelectImageError::TooLarge(size_bytes));
    }

    let bytes = std::fs::read(&path).map_err(read_failed)?;

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    Ok(PurchaseImage {
        file_name,
        mime_type: mime_type.to_string(),
        size_bytes: bytes.len() as u64,
        data_url: ImageDataUrl::encode(mime_type, &bytes),
        handle: DisplayHandle::acquire(mime_type, bytes),
    })
}
