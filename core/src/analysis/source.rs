//! Source images as data URLs

use base64::{Engine, engine::general_purpose::STANDARD};
use std::fmt;
use std::path::Path;

/// MIME type used when the format cannot be recognised.
const DEFAULT_MIME: &str = "image/png";

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("failed to read image {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("not a base64 data URL")]
    NotDataUrl,

    #[error("image data is empty")]
    Empty,
}

/// An uploaded image, held as `data:<mime>;base64,<payload>`.
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    data_url: String,
}

impl SourceImage {
    /// Encode raw image bytes. The MIME type is sniffed from the bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        let mime = image::guess_format(bytes)
            .map(|format| format.to_mime_type())
            .unwrap_or(DEFAULT_MIME);
        Ok(Self {
            data_url: format!("data:{};base64,{}", mime, STANDARD.encode(bytes)),
        })
    }

    /// Wrap an existing data URL without decoding it.
    pub fn from_data_url(data_url: impl Into<String>) -> Result<Self, ImageError> {
        let data_url = data_url.into();
        let header = data_url
            .split_once(',')
            .map(|(header, _)| header)
            .ok_or(ImageError::NotDataUrl)?;
        if !header.starts_with("data:") || !header.ends_with(";base64") {
            return Err(ImageError::NotDataUrl);
        }
        Ok(Self { data_url })
    }

    pub fn from_path(path: &Path) -> Result<Self, ImageError> {
        let bytes = std::fs::read(path).map_err(|source| ImageError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn data_url(&self) -> &str {
        &self.data_url
    }

    /// Base64 payload: everything after the first comma.
    pub fn payload(&self) -> &str {
        self.data_url
            .split_once(',')
            .map(|(_, payload)| payload)
            .unwrap_or_default()
    }

    pub fn mime_type(&self) -> &str {
        self.data_url
            .strip_prefix("data:")
            .and_then(|rest| rest.split_once(';'))
            .map(|(mime, _)| mime)
            .filter(|mime| !mime.is_empty())
            .unwrap_or(DEFAULT_MIME)
    }

    /// Decoded payload size in bytes.
    pub fn byte_len(&self) -> usize {
        let payload = self.payload().trim_end_matches('=');
        payload.len() * 3 / 4
    }
}

impl fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceImage")
            .field("mime_type", &self.mime_type())
            .field("bytes", &self.byte_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 13];
    const JPEG_HEADER: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0, 16, b'J', b'F', b'I', b'F'];

    #[test]
    fn sniffs_png_and_jpeg() {
        assert_eq!(SourceImage::from_bytes(PNG_HEADER).unwrap().mime_type(), "image/png");
        assert_eq!(SourceImage::from_bytes(JPEG_HEADER).unwrap().mime_type(), "image/jpeg");
    }

    #[test]
    fn unknown_bytes_default_to_png() {
        let image = SourceImage::from_bytes(b"not an image").unwrap();
        assert_eq!(image.mime_type(), "image/png");
        assert_eq!(STANDARD.decode(image.payload()).unwrap(), b"not an image");
    }

    #[test]
    fn payload_is_after_first_comma() {
        let image = SourceImage::from_data_url("data:image/webp;base64,AAAA,BBBB").unwrap();
        assert_eq!(image.payload(), "AAAA,BBBB");
        assert_eq!(image.mime_type(), "image/webp");
    }

    #[test]
    fn rejects_non_data_urls() {
        assert!(matches!(
            SourceImage::from_data_url("https://example.com/a.png"),
            Err(ImageError::NotDataUrl)
        ));
        assert!(matches!(
            SourceImage::from_data_url("data:image/png,plain"),
            Err(ImageError::NotDataUrl)
        ));
        assert!(matches!(SourceImage::from_bytes(&[]), Err(ImageError::Empty)));
    }

    #[test]
    fn debug_omits_payload() {
        let image = SourceImage::from_bytes(PNG_HEADER).unwrap();
        let debug = format!("{:?}", image);
        assert!(debug.contains("image/png"));
        assert!(!debug.contains(image.payload()));
    }

    #[test]
    fn reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("concept.png");
        std::fs::write(&path, PNG_HEADER).unwrap();
        let image = SourceImage::from_path(&path).unwrap();
        assert_eq!(image.byte_len(), PNG_HEADER.len());
        assert!(matches!(
            SourceImage::from_path(&dir.path().join("missing.png")),
            Err(ImageError::Read { .. })
        ));
    }
}
