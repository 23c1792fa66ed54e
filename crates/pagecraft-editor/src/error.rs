//! Error types for editing sessions

use pagecraft_migrate::MigrationError;
use pagecraft_model::{DocumentError, RegistryError, StepError};
use pagecraft_store::{GatewayError, UploadError};
use pagecraft_tree::PathError;

/// Main editor error type
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// Malformed path
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// Document rejected an edit
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// Field registry rejected an edit
    #[error("field error: {0}")]
    Registry(#[from] RegistryError),

    /// Step sequence rejected an edit
    #[error("step error: {0}")]
    Step(#[from] StepError),

    /// Stored document could not be normalized
    #[error("migration error: {0}")]
    Migration(#[from] MigrationError),

    /// Persistence failed
    #[error("gateway error: {0}")]
    Gateway(#[from] GatewayError),

    /// Asset upload failed
    #[error("upload error: {0}")]
    Upload(#[from] UploadError),

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// Asset attached without an uploader configured
    #[error("no asset uploader configured")]
    NoUploader,
}

impl EditorError {
    /// Whether the session is intact and the operation may be retried or
    /// corrected by the caller
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Path(_) | Self::Document(_) | Self::Registry(_) | Self::Step(_) => true,
            Self::Gateway(err) => matches!(
                err,
                GatewayError::NotFound(_) | GatewayError::TooLarge { .. } | GatewayError::Backend(_)
            ),
            Self::Upload(err) => matches!(err, UploadError::TooLarge { .. } | UploadError::Backend(_)),
            Self::Migration(_) | Self::Config(_) | Self::NoUploader => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_model::StepId;

    #[test]
    fn edit_rejections_are_recoverable() {
        let err = EditorError::from(StepError::NotFound(StepId::new("s9")));
        assert!(err.is_recoverable());
        assert!(EditorError::from(GatewayError::TooLarge { size: 10, max: 5 }).is_recoverable());
    }

    #[test]
    fn schema_and_setup_errors_are_not() {
        assert!(!EditorError::from(MigrationError::unrecoverable("root is array")).is_recoverable());
        assert!(!EditorError::NoUploader.is_recoverable());
        assert!(!EditorError::from(UploadError::MissingCredentials("api key".into())).is_recoverable());
    }
}
