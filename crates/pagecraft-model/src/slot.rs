//! Explicit configured / not-configured holder for optional sections

use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Optional document section
///
/// Serializes as `null` when not configured, so a document always states
/// every optional section explicitly.
#[derive(Debug, Clone, PartialEq)]
pub enum Slot<T> {
    /// Section switched off or never set up
    NotConfigured,
    /// Section present
    Configured(Arc<T>),
}

impl<T> Slot<T> {
    /// Wrap a configured section
    #[must_use]
    pub fn configured(section: T) -> Self {
        Self::Configured(Arc::new(section))
    }

    /// Section contents, if configured
    #[inline]
    #[must_use]
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Configured(section) => Some(section.as_ref()),
            Self::NotConfigured => None,
        }
    }

    /// Check if configured
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        matches!(self, Self::Configured(_))
    }

    /// Whether both slots hold the same allocation (or are both empty)
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Configured(a), Self::Configured(b)) => Arc::ptr_eq(a, b),
            (Self::NotConfigured, Self::NotConfigured) => true,
            _ => false,
        }
    }
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self::NotConfigured
    }
}

impl<T> From<Option<T>> for Slot<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::NotConfigured, Self::configured)
    }
}

impl<T: Serialize> Serialize for Slot<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Configured(section) => serializer.serialize_some(section.as_ref()),
            Self::NotConfigured => serializer.serialize_none(),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Slot<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}
