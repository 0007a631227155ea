//! # Upload Queue Module
//!
//! Validates fridge photos before they are sent for analysis and keeps them in
//! upload order. The queue is drained one image at a time so detections merge
//! into the ingredient store deterministically.

use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::AppError;

/// Minimum bytes needed to recognize an image signature
pub const MIN_FORMAT_BYTES: usize = 8;

/// A validated image ready to be sent to the analysis endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    /// Validate in-memory image bytes against size and format limits
    pub fn from_bytes(file_name: &str, bytes: Vec<u8>, max_size: u64) -> Result<Self, AppError> {
        if bytes.is_empty() {
            return Err(AppError::ImageValidation(format!("{file_name} is empty")));
        }

        if bytes.len() as u64 > max_size {
            return Err(AppError::ImageValidation(format!(
                "{} is {} bytes, the limit is {} bytes",
                file_name,
                bytes.len(),
                max_size
            )));
        }

        if bytes.len() < MIN_FORMAT_BYTES {
            return Err(AppError::ImageValidation(format!(
                "{file_name} is too small to be an image"
            )));
        }

        let mime_type = detect_mime_type(&bytes).ok_or_else(|| {
            AppError::ImageValidation(format!("{file_name} is not a PNG, JPEG, GIF or WebP image"))
        })?;

        debug!("Accepted {} ({}, {} bytes)", file_name, mime_type, bytes.len());
        Ok(Self {
            file_name: file_name.to_string(),
            mime_type,
            bytes,
        })
    }

    /// Read and validate an image file
    pub fn from_path(path: &Path, max_size: u64) -> Result<Self, AppError> {
        let metadata = fs::metadata(path).map_err(|e| {
            AppError::ImageValidation(format!("cannot access {}: {}", path.display(), e))
        })?;

        // Reject oversized files before reading them into memory
        if metadata.len() > max_size {
            return Err(AppError::ImageValidation(format!(
                "{} is {} bytes, the limit is {} bytes",
                path.display(),
                metadata.len(),
                max_size
            )));
        }

        let bytes = fs::read(path).map_err(|e| {
            AppError::ImageValidation(format!("cannot read {}: {}", path.display(), e))
        })?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        Self::from_bytes(&file_name, bytes, max_size)
    }
}

/// MIME type for image formats the vision endpoint accepts
fn detect_mime_type(bytes: &[u8]) -> Option<&'static str> {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => Some("image/png"),
        Ok(image::ImageFormat::Jpeg) => Some("image/jpeg"),
        Ok(image::ImageFormat::Gif) => Some("image/gif"),
        Ok(image::ImageFormat::WebP) => Some("image/webp"),
        Ok(format) => {
            debug!("Unsupported image format: {:?}", format);
            None
        }
        Err(e) => {
            debug!("Could not determine image format: {}", e);
            None
        }
    }
}

/// Uploaded images waiting for analysis, in upload order
#[derive(Debug, Default)]
pub struct ImageQueue {
    pending: VecDeque<UploadedImage>,
}

impl ImageQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, image: UploadedImage) {
        info!("Queued {} for analysis ({} pending)", image.file_name, self.pending.len() + 1);
        self.pending.push_back(image);
    }

    /// Next image in upload order
    pub fn pop_next(&mut self) -> Option<UploadedImage> {
        self.pending.pop_front()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.pending.iter().map(|image| image.file_name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_png_accepted() {
        let image = UploadedImage::from_bytes("fridge.png", PNG_SIGNATURE.to_vec(), 1024).unwrap();
        assert_eq!(image.mime_type, "image/png");
    }

    #[test]
    fn test_text_rejected() {
        let result = UploadedImage::from_bytes("notes.txt", b"just some text here".to_vec(), 1024);
        assert!(matches!(result, Err(AppError::ImageValidation(_))));
    }

    #[test]
    fn test_oversized_rejected() {
        let result = UploadedImage::from_bytes("big.png", PNG_SIGNATURE.to_vec(), 4);
        assert!(matches!(result, Err(AppError::ImageValidation(_))));
    }

    #[test]
    fn test_queue_preserves_upload_order() {
        let mut queue = ImageQueue::new();
        for name in ["a.png", "b.png", "c.png"] {
            queue.push(UploadedImage::from_bytes(name, PNG_SIGNATURE.to_vec(), 1024).unwrap());
        }

        assert_eq!(queue.file_names(), vec!["a.png", "b.png", "c.png"]);
        assert_eq!(queue.pop_next().unwrap().file_name, "a.png");
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_from_path_uses_file_name() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("shelf.png");
        fs::write(&path, PNG_SIGNATURE)?;

        let image = UploadedImage::from_path(&path, 1024)?;
        assert_eq!(image.file_name, "shelf.png");
        assert_eq!(image.bytes, PNG_SIGNATURE);
        Ok(())
    }

    #[test]
    fn test_from_path_checks_size_before_reading() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("huge.png");
        fs::write(&path, PNG_SIGNATURE)?;

        let result = UploadedImage::from_path(&path, 4);
        assert!(matches!(result, Err(AppError::ImageValidation(_))));

        let missing = UploadedImage::from_path(&dir.path().join("gone.png"), 1024);
        assert!(matches!(missing, Err(AppError::ImageValidation(_))));
        Ok(())
    }
}
