use std::path::Path;

use crate::error::{PalimpsestError, Result};

/// One image file as received from (or sent by) a client.
///
/// Owned by the request that carries it and dropped once the response is
/// written; nothing is kept on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub bytes: Vec<u8>,
    pub filename: String,
    /// Declared MIME type. This is the authoritative type check: the file
    /// extension and the byte content are not consulted.
    pub content_type: String,
}

impl UploadedImage {
    pub fn new(
        bytes: impl Into<Vec<u8>>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            filename: filename.into(),
            content_type: content_type.into(),
        }
    }

    /// Read a local file, guessing its MIME type from the extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                PalimpsestError::Validation(format!("Not a file path: {}", path.display()))
            })?;
        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self::new(bytes, filename, content_type))
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_image(&self) -> bool {
        is_image_mime(&self.content_type)
    }

    /// Size first, then type.
    pub fn validate(&self, max_bytes: usize) -> Result<()> {
        if self.size() > max_bytes {
            return Err(PalimpsestError::PayloadTooLarge { limit: max_bytes });
        }
        if !self.is_image() {
            return Err(PalimpsestError::UnsupportedMediaType(
                self.content_type.clone(),
            ));
        }
        Ok(())
    }
}

/// `image/png`, `Image/JPEG; charset=binary`, ... but not `image` or `text/plain`.
pub fn is_image_mime(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    match essence.split_once('/') {
        Some((kind, subtype)) => kind == "image" && !subtype.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_mime() {
        assert!(is_image_mime("image/png"));
        assert!(is_image_mime("image/jpeg"));
        assert!(is_image_mime("IMAGE/TIFF"));
        assert!(is_image_mime("image/png; charset=binary"));
        assert!(!is_image_mime("text/plain"));
        assert!(!is_image_mime("image"));
        assert!(!is_image_mime("image/"));
        assert!(!is_image_mime(""));
        assert!(!is_image_mime("application/octet-stream"));
    }

    #[test]
    fn test_declared_mime_is_authoritative() {
        let image = UploadedImage::new(b"0123456789".to_vec(), "plate1.jpg", "text/plain");
        let err = image.validate(1024).unwrap_err();
        assert!(matches!(err, PalimpsestError::UnsupportedMediaType(ref m) if m == "text/plain"));
    }

    #[test]
    fn test_size_checked_before_type() {
        let image = UploadedImage::new(vec![0u8; 11], "plate1.jpg", "text/plain");
        let err = image.validate(10).unwrap_err();
        assert!(matches!(err, PalimpsestError::PayloadTooLarge { limit: 10 }));
    }

    #[test]
    fn test_limit_is_inclusive() {
        let image = UploadedImage::new(vec![0u8; 10], "plate1.png", "image/png");
        assert!(image.validate(10).is_ok());
    }

    #[tokio::test]
    async fn test_from_path_guesses_mime() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plate3.png");
        std::fs::write(&path, b"fake png").unwrap();

        let image = UploadedImage::from_path(&path).await.unwrap();
        assert_eq!(image.filename, "plate3.png");
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes, b"fake png");
    }

    #[tokio::test]
    async fn test_from_path_unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.zzzunknown");
        std::fs::write(&path, b"x").unwrap();

        let image = UploadedImage::from_path(&path).await.unwrap();
        assert_eq!(image.content_type, "application/octet-stream");
        assert!(!image.is_image());
    }
}
