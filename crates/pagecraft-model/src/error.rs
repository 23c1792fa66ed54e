//! Error types for the document model

use pagecraft_tree::PathError;

use crate::field::FieldType;
use crate::ids::{FieldId, StepId};

/// Errors from [`FieldRegistry`](crate::FieldRegistry) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// Caller supplied an id that is already taken
    #[error("field id '{0}' already exists")]
    DuplicateId(FieldId),

    /// No field with this id
    #[error("field '{0}' not found")]
    NotFound(FieldId),

    /// Field type does not carry options
    #[error("field '{id}' has type '{field_type}', which has no options")]
    NotApplicable {
        /// Field that was queried
        id: FieldId,
        /// Its current type
        field_type: FieldType,
    },
}

/// Errors from [`StepSequence`](crate::StepSequence) operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StepError {
    /// No step with this id
    #[error("step '{0}' not found")]
    NotFound(StepId),

    /// Field is not in the registry
    #[error("field '{0}' not found in registry")]
    FieldNotFound(FieldId),

    /// Override or lookup for a field the step does not use
    #[error("field '{field}' is not bound to step '{step}'")]
    NotBound {
        /// Step addressed
        step: StepId,
        /// Field that is not in the step's field list
        field: FieldId,
    },

    /// Form steps render fields, not content blocks
    #[error("step '{0}' is a form step and cannot reference a content block")]
    ContentRefNotAllowed(StepId),
}

/// Errors from editing a [`ConfigDocument`](crate::ConfigDocument)
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    /// Path could not be applied
    #[error("path error: {0}")]
    Path(#[from] PathError),

    /// The document id cannot change after creation
    #[error("document id is immutable")]
    ImmutableId,

    /// The edit left a section in a shape its type cannot hold
    #[error("invalid value for section '{section}': {reason}")]
    InvalidValue {
        /// Root key of the section
        section: String,
        /// Deserializer message
        reason: String,
    },

    /// The edit would give two entries of a section the same id
    #[error("duplicate id '{id}' in section '{section}'")]
    DuplicateId {
        /// Root key of the section
        section: String,
        /// Id now used twice
        id: String,
    },

    /// The edit would retag an existing step
    #[error("step '{0}' cannot change its kind")]
    StepKindChanged(StepId),

    /// Field registry operation failed
    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Step sequence operation failed
    #[error("step error: {0}")]
    Step(#[from] StepError),

    /// Whole-document (de)serialization failed
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
