//! Pagecraft Document Model
//!
//! Typed page configuration document with a shared field pool and an
//! ordered step flow that references it.
//!
//! # Core Concepts
//!
//! - [`ConfigDocument`]: Root aggregate; every section is shared between versions
//! - [`Slot`]: Explicit configured / not-configured optional section
//! - [`FieldRegistry`]: Canonical field definitions keyed by [`FieldId`]
//! - [`StepSequence`]: Ordered steps binding fields and layering overrides
//! - [`validate_references`]: Reports pointers that no longer resolve
//!
//! # Example
//!
//! ```rust,ignore
//! let (fields, name) = doc.fields().add(FieldDraft::new("Name", FieldType::ShortText), &mut UlidIds)?;
//! let (steps, step) = StepSequence::new().insert(StepKind::Form, 0, &mut UlidIds);
//! let steps = steps.bind_field(&step, &name, &fields)?;
//! let doc = doc.with_fields(fields).with_steps(steps);
//! assert!(validate_references(&doc).is_empty());
//! ```

#![warn(unreachable_pub)]

mod content;
mod document;
mod error;
mod field;
mod ids;
mod references;
mod sections;
mod slot;
mod step;

pub use content::{is_youtube_url, BlockKind, BlockPayload, DetailContentBlock};
pub use document::{ConfigDocument, OPTIONAL_SECTIONS, REQUIRED_SECTIONS};
pub use error::{DocumentError, RegistryError, StepError};
pub use field::{FieldDefinition, FieldDraft, FieldOption, FieldPatch, FieldRegistry, FieldType, TimeConfig};
pub use ids::{BannerId, BlockId, DocumentId, FieldId, IdSource, SequentialIds, StepId, UlidIds};
pub use references::{repair_references, validate_references, DanglingReference};
pub use sections::{
    BannerPosition, BoardItem, BoardSection, ChatButtonConfig, FeatureItem, FeatureSection,
    FloatingBanner, FooterSection, FormSection, GallerySection, HeroSection, Identity,
    LocationSection, NavigationConfig, NavigationItem, PixelConfig, PopupConfig, PopupItem,
    SnsConfig, SnsItem, Theme,
};
pub use slot::Slot;
pub use step::{Direction, MoveOutcome, Step, StepKind, StepSequence};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
