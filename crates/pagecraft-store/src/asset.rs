//! Asset upload seam
//!
//! The editor hands opaque bytes to an uploader and stores whatever URL
//! comes back. Hosting, resizing and credentials live behind the trait.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::UploadError;

/// File handed to an uploader
#[derive(Clone, PartialEq, Eq)]
pub struct AssetBlob {
    /// Original file name
    pub file_name: String,
    /// Media type, e.g. `image/png`
    pub content_type: String,
    /// File contents
    pub bytes: Vec<u8>,
}

impl AssetBlob {
    /// Create blob
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size in bytes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the blob has no contents
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Whether the media type is an image
    #[inline]
    #[must_use]
    pub fn is_image(&self) -> bool {
        self.content_type.starts_with("image/")
    }
}

impl fmt::Debug for AssetBlob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssetBlob")
            .field("file_name", &self.file_name)
            .field("content_type", &self.content_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Upload a blob and return the public URL it is served from
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Upload `blob`
    ///
    /// # Errors
    /// Returns [`UploadError`] if the blob is rejected or the backend fails
    async fn upload(&self, blob: AssetBlob) -> Result<String, UploadError>;
}

#[async_trait]
impl<U: AssetUploader + ?Sized> AssetUploader for Arc<U> {
    async fn upload(&self, blob: AssetBlob) -> Result<String, UploadError> {
        (**self).upload(blob).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_omits_bytes() {
        let blob = AssetBlob::new("hero.png", "image/png", vec![0; 2048]);
        let shown = format!("{blob:?}");
        assert!(shown.contains("len: 2048"));
        assert!(!shown.contains("0, 0"));
    }

    #[test]
    fn image_detection() {
        assert!(AssetBlob::new("a.webp", "image/webp", vec![1]).is_image());
        assert!(!AssetBlob::new("a.mp4", "video/mp4", vec![1]).is_image());
    }
}
