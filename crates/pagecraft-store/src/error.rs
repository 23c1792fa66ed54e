//! Error types for persistence and uploads

use pagecraft_model::DocumentId;

/// Errors from a persistence gateway
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Nothing stored under the id
    #[error("document not found: {0}")]
    NotFound(DocumentId),

    /// Serialized document exceeds the storage ceiling
    #[error("document is {size} bytes, ceiling is {max}")]
    TooLarge {
        /// Serialized size in bytes
        size: usize,
        /// Ceiling in bytes
        max: usize,
    },

    /// Storage backend failed
    #[error("backend error: {0}")]
    Backend(String),

    /// Stored text is not valid JSON, or a document did not serialize
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl GatewayError {
    /// Whether the error only means there is nothing stored yet
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Errors from an asset uploader
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadError {
    /// Blob exceeds the uploader's size limit
    #[error("asset is {size} bytes, limit is {max}")]
    TooLarge {
        /// Blob size in bytes
        size: usize,
        /// Limit in bytes
        max: usize,
    },

    /// Uploader does not accept this media type
    #[error("unsupported content type: {0}")]
    UnsupportedType(String),

    /// Uploader has no credentials configured
    #[error("uploader is not configured: {0}")]
    MissingCredentials(String),

    /// Upload backend failed
    #[error("upload backend error: {0}")]
    Backend(String),
}
