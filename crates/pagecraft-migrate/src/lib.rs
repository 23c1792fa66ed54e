//! Pagecraft Schema Migration
//!
//! Reconciles documents from any historical source into the current shape.
//!
//! # Core Concepts
//!
//! - [`Migration`]: Pure, idempotent rewrite of one legacy shape
//! - [`SchemaMigrator`]: Runs migrations in a fixed order, fills required
//!   sections from defaults and makes optional sections explicit
//! - [`default_document`]: Canonical document every gap is filled from
//!
//! # Example
//!
//! ```rust
//! use pagecraft_migrate::{default_document, normalize};
//! use pagecraft_tree::Node;
//!
//! let raw = Node::from(serde_json::json!({"banner": {"text": "Call now"}}));
//! let doc = normalize(&raw, &default_document("page-1")).unwrap();
//! assert_eq!(doc.banners()[0].id.as_str(), "legacy_banner");
//! assert!(doc.hero().is_show);
//! ```

#![warn(unreachable_pub)]

mod defaults;
mod error;
mod merge;
mod migrations;
mod migrator;

pub use defaults::{default_document, DEFAULT_PRIMARY_COLOR, DEFAULT_SECONDARY_COLOR};
pub use error::MigrationError;
pub use merge::fill_missing;
pub use migrations::{
    standard_migrations, AssignMissingIds, BannerDefaults, CoerceFieldTypes, DetailImagesToBlocks,
    InitializeSectionItems, LegacyBannerToList, Migration, SnsLegacyLinksToItems,
};
pub use migrator::{normalize, normalize_with_report, NormalizeReport, SchemaMigrator};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
