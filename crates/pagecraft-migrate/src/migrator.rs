//! Normalization pipeline
//!
//! Turns whatever a gateway returned into a valid [`ConfigDocument`]:
//! shape migrations first, then required sections filled from defaults,
//! then optional sections made explicit, then typed conversion.

use std::fmt;

use pagecraft_model::{
    BoardSection, ChatButtonConfig, ConfigDocument, FeatureSection, GallerySection,
    LocationSection, NavigationConfig, PixelConfig, PopupConfig, SnsConfig, StepSequence,
    OPTIONAL_SECTIONS,
};
use pagecraft_tree::Node;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::MigrationError;
use crate::merge::fill_missing;
use crate::migrations::{standard_migrations, Migration};

/// Required object sections, filled member by member from defaults
const OBJECT_SECTIONS: [&str; 4] = ["theme", "hero", "formConfig", "footer"];

/// Required list sections, replaced wholesale when unusable
const LIST_SECTIONS: [&str; 2] = ["banners", "detailContent"];

/// What a normalization pass did to a raw document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Migrations that changed the document, in the order they ran
    pub applied: Vec<&'static str>,
    /// Required sections that were absent or incomplete and got defaults
    pub filled_sections: Vec<String>,
    /// Optional sections that were malformed and reset to not configured
    pub reset_sections: Vec<String>,
}

impl NormalizeReport {
    /// Whether the raw document was already in the current shape
    #[inline]
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.applied.is_empty() && self.filled_sections.is_empty() && self.reset_sections.is_empty()
    }
}

/// Ordered migration pipeline
pub struct SchemaMigrator {
    migrations: Vec<Box<dyn Migration>>,
}

impl SchemaMigrator {
    /// Migrator running the given migrations in order
    #[must_use]
    pub fn with_migrations(migrations: Vec<Box<dyn Migration>>) -> Self {
        Self { migrations }
    }

    /// Names of the migrations, in the order they run
    #[must_use]
    pub fn migration_names(&self) -> Vec<&'static str> {
        self.migrations.iter().map(|m| m.name()).collect()
    }

    /// Normalize `raw` into a valid document
    ///
    /// # Errors
    /// Returns [`MigrationError::UnrecoverableSchema`] if the root is not
    /// an object, a required section is not an object, or the result does
    /// not convert to a typed document
    pub fn normalize(&self, raw: &Node, defaults: &ConfigDocument) -> Result<ConfigDocument, MigrationError> {
        self.normalize_with_report(raw, defaults).map(|(doc, _)| doc)
    }

    /// Normalize `raw` and report what changed
    ///
    /// # Errors
    /// Same as [`SchemaMigrator::normalize`]
    pub fn normalize_with_report(
        &self,
        raw: &Node,
        defaults: &ConfigDocument,
    ) -> Result<(ConfigDocument, NormalizeReport), MigrationError> {
        let mut report = NormalizeReport::default();
        let mut doc = match raw {
            Node::Null => Node::empty_object(),
            Node::Object(_) => raw.clone(),
            other => {
                return Err(MigrationError::unrecoverable(format!(
                    "document root is {}, expected object",
                    other.kind()
                )))
            }
        };

        for migration in &self.migrations {
            let next = migration.apply(&doc)?;
            if !next.same_ref(&doc) {
                debug!(migration = migration.name(), "Applied migration");
                report.applied.push(migration.name());
                doc = next;
            }
        }

        let default_node = defaults
            .to_node()
            .map_err(|e| MigrationError::unrecoverable(format!("defaults do not serialize: {e}")))?;

        for key in OBJECT_SECTIONS {
            let fallback = default_node.get_key(key).cloned().unwrap_or_default();
            let filled = match doc.get_key(key) {
                None | Some(Node::Null) => fallback,
                Some(section @ Node::Object(_)) => fill_missing(section, &fallback),
                Some(other) => {
                    return Err(MigrationError::unrecoverable(format!(
                        "section '{key}' is {}, expected object",
                        other.kind()
                    )))
                }
            };
            doc = replace_member(&doc, key, filled, &mut report);
        }

        for key in LIST_SECTIONS {
            if !doc.get_key(key).is_some_and(Node::is_array) {
                let fallback = default_node.get_key(key).cloned().unwrap_or_else(Node::empty_array);
                doc = replace_member(&doc, key, fallback, &mut report);
            }
        }

        if doc.get_key("title").map_or(true, Node::is_null) {
            let fallback = default_node.get_key("title").cloned().unwrap_or_else(|| Node::from(""));
            doc = replace_member(&doc, "title", fallback, &mut report);
        }

        for key in OPTIONAL_SECTIONS {
            match doc.get_key(key) {
                None => doc = doc.with_member(key, Node::Null),
                Some(Node::Null) => {}
                Some(section) => {
                    if let Err(reason) = check_optional(key, section) {
                        warn!(section = key, %reason, "Malformed optional section reset to not configured");
                        report.reset_sections.push(key.to_string());
                        doc = doc.with_member(key, Node::Null);
                    }
                }
            }
        }

        let id = match doc.get_key("id").and_then(Node::as_str) {
            Some(id) if !id.is_empty() => None,
            _ => Some(Node::from(defaults.id().as_str())),
        };
        if let Some(id) = id {
            doc = doc.with_member("id", id);
        }

        let typed = ConfigDocument::from_node(&doc)
            .map_err(|e| MigrationError::unrecoverable(format!("document does not match schema: {e}")))?;
        Ok((typed, report))
    }
}

impl Default for SchemaMigrator {
    fn default() -> Self {
        Self::with_migrations(standard_migrations())
    }
}

impl fmt::Debug for SchemaMigrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaMigrator")
            .field("migrations", &self.migration_names())
            .finish()
    }
}

fn replace_member(doc: &Node, key: &str, value: Node, report: &mut NormalizeReport) -> Node {
    match doc.get_key(key) {
        Some(current) if current.same_ref(&value) => doc.clone(),
        _ => {
            report.filled_sections.push(key.to_string());
            doc.with_member(key, value)
        }
    }
}

fn check_as<T: DeserializeOwned>(section: &Node) -> Result<(), String> {
    serde_json::from_value::<T>(section.to_value())
        .map(drop)
        .map_err(|e| e.to_string())
}

fn check_optional(key: &str, section: &Node) -> Result<(), String> {
    match key {
        "navigation" => check_as::<NavigationConfig>(section),
        "gallery" => check_as::<GallerySection>(section),
        "board" => check_as::<BoardSection>(section),
        "location" => check_as::<LocationSection>(section),
        "snsConfig" => check_as::<SnsConfig>(section),
        "features" => check_as::<FeatureSection>(section),
        "chatConfig" => check_as::<ChatButtonConfig>(section),
        "popupConfig" => check_as::<PopupConfig>(section),
        "pixelConfig" => check_as::<PixelConfig>(section),
        "steps" => check_as::<StepSequence>(section),
        _ => Ok(()),
    }
}

/// Normalize with the standard migrations
///
/// # Errors
/// See [`SchemaMigrator::normalize`]
pub fn normalize(raw: &Node, defaults: &ConfigDocument) -> Result<ConfigDocument, MigrationError> {
    SchemaMigrator::default().normalize(raw, defaults)
}

/// Normalize with the standard migrations and report what changed
///
/// # Errors
/// See [`SchemaMigrator::normalize`]
pub fn normalize_with_report(
    raw: &Node,
    defaults: &ConfigDocument,
) -> Result<(ConfigDocument, NormalizeReport), MigrationError> {
    SchemaMigrator::default().normalize_with_report(raw, defaults)
}
