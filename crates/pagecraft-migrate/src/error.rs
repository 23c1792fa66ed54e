//! Error types for schema migration

use pagecraft_tree::PathError;

/// Errors from normalizing a raw document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrationError {
    /// Required data is missing or malformed and defaults cannot fill it
    #[error("unrecoverable schema: {reason}")]
    UnrecoverableSchema {
        /// What could not be reconciled
        reason: String,
    },

    /// A migration addressed the tree incorrectly
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

impl MigrationError {
    /// Shorthand for [`MigrationError::UnrecoverableSchema`]
    #[must_use]
    pub fn unrecoverable(reason: impl Into<String>) -> Self {
        Self::UnrecoverableSchema {
            reason: reason.into(),
        }
    }
}
