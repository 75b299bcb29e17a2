use std::sync::Arc;

use base64::prelude::*;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Used when a data URL does not declare its MIME type
pub const DEFAULT_IMAGE_MIME_TYPE: &str = "image/png";

#[derive(Debug, Error)]
pub enum DataUrlError {
    #[error("Data URL payload is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// Image bytes as carried inline by a `data:<mime>;base64,<payload>` URL
#[derive(Debug, PartialEq)]
pub struct ImageDataUrl {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageDataUrl {
    /// Without a ',' the whole text is metadata and the payload is empty
    pub fn parse(data_url: &str) -> Result<Self, DataUrlError> {
        let (meta, payload) = data_url.split_once(',').unwrap_or((data_url, ""));

        let mime_type = meta
            .strip_prefix("data:")
            .and_then(|rest| rest.strip_suffix(";base64"))
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_IMAGE_MIME_TYPE);

        Ok(Self {
            mime_type: mime_type.to_string(),
            bytes: BASE64_STANDARD.decode(payload)?,
        })
    }

    pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
        format!("data:{};base64,{}", mime_type, BASE64_STANDARD.encode(bytes))
    }
}

/// In-process reference to decoded image bytes. Never persisted.
///
/// Each acquisition gets a fresh id, so two handles over the same payload are
/// distinct. Dropping the handle frees the bytes; `release` does the same and
/// leaves a trace in the logs.
#[derive(Debug)]
pub struct DisplayHandle {
    id: Uuid,
    mime_type: String,
    bytes: Arc<[u8]>,
}

impl DisplayHandle {
    pub fn acquire(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        let handle = Self {
            id: Uuid::new_v4(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        };
        debug!(handle = %handle.url(), size = handle.bytes.len(), "Acquired display handle");
        handle
    }

    pub fn from_data_url(data_url: &str) -> Result<Self, DataUrlError> {
        let image = ImageDataUrl::parse(data_url)?;
        Ok(Self::acquire(image.mime_type, image.bytes))
    }

    pub fn url(&self) -> String {
        format!("blob:worldlots/{}", self.id)
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn release(self) {
        debug!(handle = %self.url(), "Released display handle");
    }
}

/// Image picked for a draft, before the purchase is confirmed
#[derive(Debug)]
pub struct PurchaseImage {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub data_url: String,
    pub handle: DisplayHandle,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_data_url() {
        let image = ImageDataUrl::parse("data:image/webp;base64,AAEC").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert_eq!(image.bytes, vec![0, 1, 2]);
    }

    #[test]
    fn test_parse_data_url_without_mime_defaults_to_png() {
        let image = ImageDataUrl::parse("data:;base64,AAEC").unwrap();
        assert_eq!(image.mime_type, DEFAULT_IMAGE_MIME_TYPE);

        let image = ImageDataUrl::parse("garbage,AAEC").unwrap();
        assert_eq!(image.mime_type, DEFAULT_IMAGE_MIME_TYPE);
    }

    #[test]
    fn test_parse_data_url_without_separator_has_empty_payload() {
        let image = ImageDataUrl::parse("data:image/webp;base64").unwrap();
        assert_eq!(image.mime_type, "image/webp");
        assert!(image.bytes.is_empty());

        let handle = DisplayHandle::from_data_url("data:image/png;base64").unwrap();
        assert!(handle.bytes().is_empty());
    }

    #[test]
    fn test_parse_data_url_invalid_base64() {
        assert!(matches!(
            ImageDataUrl::parse("data:image/png;base64,!!not base64!!"),
            Err(DataUrlError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_encode_matches_parse() {
        let data_url = ImageDataUrl::encode("image/jpeg", &[0xff, 0xd8, 0xff]);
        assert_eq!(data_url, "data:image/jpeg;base64,/9j/");

        let image = ImageDataUrl::parse(&data_url).unwrap();
        assert_eq!(image.bytes, vec![0xff, 0xd8, 0xff]);
    }

    #[test]
    fn test_handles_are_unique_per_acquisition() {
        let first = DisplayHandle::from_data_url("data:image/png;base64,AAEC").unwrap();
        let second = DisplayHandle::from_data_url("data:image/png;base64,AAEC").unwrap();

        assert_ne!(first.url(), second.url());
        assert_eq!(first.bytes(), second.bytes());
        assert_eq!(first.mime_type(), "image/png");
    }
}
