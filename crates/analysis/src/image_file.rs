//! In-memory image payload for an upload.

use std::path::Path;

/// MIME type used when the content cannot be identified.
pub const UNKNOWN_MIME_TYPE: &str = "application/octet-stream";

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Read a file from disk, identifying its type from the content
    /// header and falling back to the extension.
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let mime_type = sniff_mime_type(path, &bytes);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Whether the declared MIME type is an image type.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

fn sniff_mime_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| UNKNOWN_MIME_TYPE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

    #[test]
    fn png_header_is_detected_regardless_of_extension() {
        let mime = sniff_mime_type(Path::new("photo.dat"), PNG_MAGIC);
        assert_eq!(mime, "image/png");
    }

    #[test]
    fn extension_is_used_when_header_is_unknown() {
        let mime = sniff_mime_type(Path::new("photo.jpg"), b"not really a jpeg");
        assert_eq!(mime, "image/jpeg");
    }

    #[test]
    fn unidentified_content_is_not_an_image() {
        let mime = sniff_mime_type(Path::new("notes.txt"), b"hello");
        assert_eq!(mime, UNKNOWN_MIME_TYPE);
        assert!(!ImageFile::new("notes.txt", mime, b"hello".to_vec()).is_image());
    }

    #[tokio::test]
    async fn from_path_reads_bytes_and_name() {
        let path = std::env::temp_dir().join(format!("skinwise-{}.png", std::process::id()));
        tokio::fs::write(&path, PNG_MAGIC).await.unwrap();

        let file = ImageFile::from_path(&path).await.unwrap();
        tokio::fs::remove_file(&path).await.unwrap();

        assert!(file.file_name.ends_with(".png"));
        assert_eq!(file.mime_type, "image/png");
        assert_eq!(file.bytes, PNG_MAGIC);
        assert!(file.is_image());
    }
}
