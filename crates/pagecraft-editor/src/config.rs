//! Editor configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EditorError;

/// Editor configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Largest serialized document the remote store accepts
    pub max_document_bytes: usize,
    /// Seconds a remotely loaded document stays cached
    pub remote_cache_ttl_secs: u64,
    /// Number of remotely loaded documents kept cached
    pub remote_cache_capacity: u64,
    /// Check references before saving
    pub validate_before_save: bool,
    /// Open a fresh default document when the stored one cannot be normalized
    pub fallback_to_defaults: bool,
    /// Remove dangling references on save instead of only reporting them
    pub prune_dangling_on_save: bool,
}

impl EditorConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    ///
    /// # Errors
    /// [`EditorError::Config`] if the text is not valid TOML or a value has
    /// the wrong type
    pub fn from_toml_str(text: &str) -> Result<Self, EditorError> {
        Ok(toml::from_str(text)?)
    }

    /// Remote cache time-to-live
    #[inline]
    #[must_use]
    pub fn remote_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.remote_cache_ttl_secs)
    }

    /// With size ceiling
    #[inline]
    #[must_use]
    pub fn with_max_document_bytes(mut self, max: usize) -> Self {
        self.max_document_bytes = max;
        self
    }

    /// With remote cache time-to-live
    #[inline]
    #[must_use]
    pub fn with_remote_cache_ttl(mut self, ttl: Duration) -> Self {
        self.remote_cache_ttl_secs = ttl.as_secs();
        self
    }

    /// With remote cache capacity
    #[inline]
    #[must_use]
    pub fn with_remote_cache_capacity(mut self, capacity: u64) -> Self {
        self.remote_cache_capacity = capacity;
        self
    }

    /// With reference validation before save
    #[inline]
    #[must_use]
    pub fn with_validate_before_save(mut self, validate: bool) -> Self {
        self.validate_before_save = validate;
        self
    }

    /// With fallback to defaults on unreadable documents
    #[inline]
    #[must_use]
    pub fn with_fallback_to_defaults(mut self, fallback: bool) -> Self {
        self.fallback_to_defaults = fallback;
        self
    }

    /// With pruning of dangling references on save
    #[inline]
    #[must_use]
    pub fn with_prune_dangling_on_save(mut self, prune: bool) -> Self {
        self.prune_dangling_on_save = prune;
        self
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 45 * 1024,
            remote_cache_ttl_secs: 30 * 60,
            remote_cache_capacity: 256,
            validate_before_save: true,
            fallback_to_defaults: true,
            prune_dangling_on_save: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = EditorConfig::new();
        assert_eq!(config.max_document_bytes, 46_080);
        assert_eq!(config.remote_cache_ttl(), Duration::from_secs(1800));
        assert!(config.validate_before_save);
        assert!(config.fallback_to_defaults);
        assert!(!config.prune_dangling_on_save);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EditorConfig::from_toml_str(
            r#"
            max_document_bytes = 1024
            prune_dangling_on_save = true
            "#,
        )
        .unwrap();
        assert_eq!(
            config,
            EditorConfig::new()
                .with_max_document_bytes(1024)
                .with_prune_dangling_on_save(true)
        );
    }

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(EditorConfig::from_toml_str("").unwrap(), EditorConfig::default());
    }

    #[test]
    fn mistyped_toml_is_rejected() {
        let err = EditorConfig::from_toml_str("max_document_bytes = \"big\"").unwrap_err();
        assert!(matches!(err, EditorError::Config(_)));
    }
}
