//! Image references and loading.
//!
//! A cell holds an [`ImageSource`]: an opaque handle that is only turned into
//! pixels at render time through an [`ImageLoader`]. The default
//! [`SourceLoader`] reads files with `tokio::fs`, downloads URLs with
//! `reqwest` and decodes on the blocking pool.

use async_trait::async_trait;
use base64::Engine;
use image::DynamicImage;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::PrintardError;

/// Where a cell's image comes from.
#[derive(Clone, PartialEq)]
pub enum ImageSource {
    /// Encoded image bytes held in memory (uploads, data URIs).
    Bytes(Arc<[u8]>),
    /// Encoded image file on disk.
    Path(PathBuf),
    /// Remote image fetched over HTTP(S).
    Url(String),
}

impl ImageSource {
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self::Bytes(Arc::from(bytes))
    }

    /// Parse a textual reference: `data:` URI, `http(s)://` URL or file path.
    pub fn parse(reference: &str) -> Result<Self, PrintardError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(PrintardError::ImageDecode("empty image reference".to_string()));
        }
        if let Some(rest) = reference.strip_prefix("data:") {
            return decode_data_uri(rest).map(Self::from_bytes);
        }
        if reference.starts_with("http://") || reference.starts_with("https://") {
            return Ok(Self::Url(reference.to_string()));
        }
        Ok(Self::Path(PathBuf::from(reference)))
    }

    /// Cheap identity check: shared buffers compare by pointer.
    pub fn same_as(&self, other: &ImageSource) -> bool {
        match (self, other) {
            (Self::Bytes(a), Self::Bytes(b)) => Arc::ptr_eq(a, b),
            (Self::Path(a), Self::Path(b)) => a == b,
            (Self::Url(a), Self::Url(b)) => a == b,
            _ => false,
        }
    }

    /// Short description for logs and API responses.
    pub fn describe(&self) -> String {
        match self {
            Self::Bytes(b) => format!("{} bytes", b.len()),
            Self::Path(p) => p.display().to_string(),
            Self::Url(u) => u.clone(),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(b) => write!(f, "Bytes({} bytes)", b.len()),
            Self::Path(p) => write!(f, "Path({:?})", p),
            Self::Url(u) => write!(f, "Url({:?})", u),
        }
    }
}

/// Decode the part of a data URI after `data:`.
fn decode_data_uri(rest: &str) -> Result<Vec<u8>, PrintardError> {
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| PrintardError::ImageDecode("malformed data URI".to_string()))?;
    if !meta.starts_with("image/") {
        return Err(PrintardError::ImageDecode(format!(
            "data URI is not an image: {}",
            meta
        )));
    }
    if !meta.ends_with(";base64") {
        return Err(PrintardError::ImageDecode(
            "only base64 data URIs are supported".to_string(),
        ));
    }
    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| PrintardError::ImageDecode(format!("invalid base64 payload: {}", e)))
}

/// True if a MIME type names an image.
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.trim().to_lowercase().starts_with("image/")
}

/// True if a filename's extension maps to an image MIME type.
pub fn is_image_filename(filename: &str) -> bool {
    mime_guess::from_path(filename)
        .first()
        .is_some_and(|m| m.type_() == mime_guess::mime::IMAGE)
}

/// Fetches and decodes image sources.
///
/// Implementations may suspend; the renderer awaits each call before moving
/// to the next cell.
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, PrintardError>;
}

/// Default loader for bytes, files and HTTP URLs.
pub struct SourceLoader {
    http_client: reqwest::Client,
}

impl SourceLoader {
    pub fn new() -> Result<Self, PrintardError> {
        let http_client = reqwest::Client::builder()
            .user_agent("printard/0.1")
            .build()
            .map_err(|e| PrintardError::ImageDecode(format!("HTTP client error: {}", e)))?;
        Ok(Self::with_client(http_client))
    }

    pub fn with_client(http_client: reqwest::Client) -> Self {
        Self { http_client }
    }

    async fn fetch(&self, url: &str) -> Result<Arc<[u8]>, PrintardError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| PrintardError::ImageDecode(format!("Failed to download {}: {}", url, e)))?;
        if !response.status().is_success() {
            return Err(PrintardError::ImageDecode(format!(
                "Failed to download {}: HTTP {}",
                url,
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PrintardError::ImageDecode(format!("Failed to read image data: {}", e)))?;
        Ok(Arc::from(bytes.to_vec()))
    }
}

#[async_trait]
impl ImageLoader for SourceLoader {
    async fn load(&self, source: &ImageSource) -> Result<DynamicImage, PrintardError> {
        let bytes = match source {
            ImageSource::Bytes(bytes) => bytes.clone(),
            ImageSource::Path(path) => {
                let data = tokio::fs::read(path).await.map_err(|e| {
                    PrintardError::ImageDecode(format!("Failed to read {}: {}", path.display(), e))
                })?;
                Arc::from(data)
            }
            ImageSource::Url(url) => self.fetch(url).await?,
        };
        decode(bytes).await
    }
}

/// Decode encoded image bytes on the blocking pool.
pub async fn decode(bytes: Arc<[u8]>) -> Result<DynamicImage, PrintardError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await
        .map_err(|e| PrintardError::ImageDecode(format!("Decode task failed: {}", e)))?
        .map_err(|e| PrintardError::ImageDecode(format!("Failed to decode image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([10, 20, 30]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        out.into_inner()
    }

    #[test]
    fn test_parse_kinds() {
        assert_eq!(
            ImageSource::parse("https://example.com/a.png").unwrap(),
            ImageSource::Url("https://example.com/a.png".to_string())
        );
        assert_eq!(
            ImageSource::parse("cards/front.jpg").unwrap(),
            ImageSource::Path(PathBuf::from("cards/front.jpg"))
        );
        assert!(ImageSource::parse("   ").is_err());
    }

    #[test]
    fn test_parse_data_uri() {
        let source = ImageSource::parse("data:image/png;base64,aGVsbG8=").unwrap();
        match source {
            ImageSource::Bytes(bytes) => assert_eq!(&bytes[..], b"hello"),
            other => panic!("expected bytes, got {:?}", other),
        }
        assert!(ImageSource::parse("data:text/plain;base64,aGVsbG8=").is_err());
        assert!(ImageSource::parse("data:image/png,raw").is_err());
        assert!(ImageSource::parse("data:image/png;base64").is_err());
    }

    #[test]
    fn test_same_as_uses_buffer_identity() {
        let a = ImageSource::from_bytes(vec![1, 2, 3]);
        let b = a.clone();
        let c = ImageSource::from_bytes(vec![1, 2, 3]);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&c));
        assert_eq!(a, c);
    }

    #[test]
    fn test_image_type_checks() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("IMAGE/JPEG"));
        assert!(!is_image_content_type("application/pdf"));
        assert!(is_image_filename("front.webp"));
        assert!(is_image_filename("scan.JPG"));
        assert!(!is_image_filename("notes.txt"));
        assert!(!is_image_filename("no_extension"));
    }

    #[tokio::test]
    async fn test_load_bytes() {
        let loader = SourceLoader::new().unwrap();
        let source = ImageSource::from_bytes(png_bytes(4, 2));
        let img = loader.load(&source).await.unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
    }

    #[tokio::test]
    async fn test_load_corrupt_bytes_fails() {
        let loader = SourceLoader::new().unwrap();
        let source = ImageSource::from_bytes(b"not an image".to_vec());
        let err = loader.load(&source).await.unwrap_err();
        assert!(matches!(err, PrintardError::ImageDecode(_)));
    }

    #[tokio::test]
    async fn test_load_missing_file_fails() {
        let loader = SourceLoader::new().unwrap();
        let source = ImageSource::Path(PathBuf::from("/nonexistent/printard/card.png"));
        assert!(matches!(
            loader.load(&source).await,
            Err(PrintardError::ImageDecode(_))
        ));
    }

    #[tokio::test]
    async fn test_load_file() {
        let path = std::env::temp_dir().join(format!("printard-source-{}.png", std::process::id()));
        std::fs::write(&path, png_bytes(3, 5)).unwrap();
        let loader = SourceLoader::new().unwrap();
        let img = loader.load(&ImageSource::Path(path.clone())).await.unwrap();
        assert_eq!((img.width(), img.height()), (3, 5));
        let _ = std::fs::remove_file(path);
    }
}
