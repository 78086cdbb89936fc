/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the file picker, the workflow and the network client.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::workflow::MAX_UPLOAD_BYTES;

/// Fallback MIME type when the file is not a recognised image
const OCTET_STREAM: &str = "application/octet-stream";

/// An image file picked by the user
///
/// Files within the upload limit are held in memory until submission.
/// Larger ones only record their size, so submission can reject them
/// without ever reading the contents.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedImage {
    /// Filename only (e.g., "portrait.jpg"), sent as the multipart file name
    pub file_name: String,
    /// Size of the file on disk
    size: u64,
    /// File contents; `None` when the file exceeds the upload limit
    bytes: Option<Arc<[u8]>>,
    /// Detected MIME type (e.g., "image/png")
    pub mime_type: String,
}

impl SelectedImage {
    /// Build from already-loaded bytes, sniffing the MIME type
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let mime_type = detect_mime_type(Path::new(&file_name), &bytes);
        Self {
            file_name,
            size: bytes.len() as u64,
            bytes: Some(bytes.into()),
            mime_type,
        }
    }

    /// A file too large to upload; only its size is kept
    pub fn oversized(file_name: impl Into<String>, size: u64) -> Self {
        let file_name = file_name.into();
        let mime_type = image::ImageFormat::from_path(&file_name)
            .map(|format| format.to_mime_type().to_string())
            .unwrap_or_else(|_| OCTET_STREAM.to_string());
        Self {
            file_name,
            size,
            bytes: None,
            mime_type,
        }
    }

    /// Size in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// File contents, if they were loaded
    pub fn contents(&self) -> Option<&Arc<[u8]>> {
        self.bytes.as_ref()
    }
}

/// Read a picked file from disk
///
/// The size is checked first; files over the upload limit are not read.
pub async fn load_selected_image(path: PathBuf) -> Result<SelectedImage, String> {
    let read_error = |e: std::io::Error| format!("Failed to read {}: {}", path.display(), e);

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    let size = tokio::fs::metadata(&path).await.map_err(read_error)?.len();
    if size > MAX_UPLOAD_BYTES {
        tracing::debug!("{} is {} bytes, not loading", path.display(), size);
        return Ok(SelectedImage::oversized(file_name, size));
    }

    let bytes = tokio::fs::read(&path).await.map_err(read_error)?;
    let image = SelectedImage::from_bytes(file_name, bytes);
    tracing::debug!(
        "loaded {} ({} bytes, {})",
        path.display(),
        image.size(),
        image.mime_type
    );
    Ok(image)
}

/// Content sniffing first, then the file extension
fn detect_mime_type(path: &Path, bytes: &[u8]) -> String {
    image::guess_format(bytes)
        .or_else(|_| image::ImageFormat::from_path(path))
        .map(|format| format.to_mime_type().to_string())
        .unwrap_or_else(|_| OCTET_STREAM.to_string())
}

/// Human-readable byte size for the preview caption
pub fn format_size(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    const MIB: f64 = KIB * 1024.0;

    let bytes_f = bytes as f64;
    if bytes_f >= MIB {
        format!("{:.1} MB", bytes_f / MIB)
    } else if bytes_f >= KIB {
        format!("{:.1} KB", bytes_f / KIB)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_mime_from_content() {
        // Content wins over a misleading extension
        let image = SelectedImage::from_bytes("photo.jpg", PNG_MAGIC.to_vec());
        assert_eq!(image.mime_type, "image/png");
        assert_eq!(image.size(), 8);
    }

    #[test]
    fn test_mime_from_extension() {
        let image = SelectedImage::from_bytes("photo.jpeg", vec![1, 2, 3]);
        assert_eq!(image.mime_type, "image/jpeg");
    }

    #[test]
    fn test_unknown_file_is_octet_stream() {
        let image = SelectedImage::from_bytes("notes.txt", b"hello".to_vec());
        assert_eq!(image.mime_type, OCTET_STREAM);
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }

    #[tokio::test]
    async fn test_load_small_file() {
        let path = std::env::temp_dir().join(format!("ghibli-art-small-{}.png", std::process::id()));
        std::fs::write(&path, PNG_MAGIC).unwrap();

        let image = load_selected_image(path.clone()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image.size(), 8);
        assert_eq!(image.contents().map(|b| b.len()), Some(8));
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_oversized_file_is_not_read() {
        let path = std::env::temp_dir().join(format!("ghibli-art-huge-{}.png", std::process::id()));
        // Sparse file: large on paper, nothing written
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(512 * 1024 * 1024).unwrap();
        drop(file);

        let image = load_selected_image(path.clone()).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(image.size(), 512 * 1024 * 1024);
        assert!(image.contents().is_none());
        assert_eq!(image.file_name, format!("ghibli-art-huge-{}.png", std::process::id()));
        assert_eq!(image.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_load_missing_file() {
        let err = load_selected_image(PathBuf::from("/definitely/not/here.png"))
            .await
            .unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
