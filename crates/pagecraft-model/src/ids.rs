//! Identifier types and id generation

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier
            #[inline]
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Identifier text
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the identifier is blank
            #[inline]
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Caller-supplied document identifier, fixed once a document exists
    DocumentId
);
string_id!(
    /// Stable identifier of a form field definition
    FieldId
);
string_id!(
    /// Stable identifier of a step
    StepId
);
string_id!(
    /// Identifier of a detail-content block
    BlockId
);
string_id!(
    /// Identifier of a floating banner
    BannerId
);

/// Source of fresh identifiers
///
/// Registry and sequence operations draw new ids from here so that tests
/// can substitute a deterministic source.
pub trait IdSource {
    /// Produce an id that starts with `prefix`
    fn next_id(&mut self, prefix: &str) -> String;
}

/// ULID-backed ids, e.g. `field_01hx...`
#[derive(Debug, Default, Clone, Copy)]
pub struct UlidIds;

impl IdSource for UlidIds {
    fn next_id(&mut self, prefix: &str) -> String {
        format!("{prefix}_{}", Ulid::new().to_string().to_lowercase())
    }
}

/// Counter-backed ids, e.g. `field_1`, `field_2`
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    counter: u64,
}

impl SequentialIds {
    /// Start counting from 1
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&mut self, prefix: &str) -> String {
        self.counter += 1;
        format!("{prefix}_{}", self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ulid_ids_are_prefixed_and_unique() {
        let mut ids = UlidIds;
        let a = ids.next_id("field");
        let b = ids.next_id("field");
        assert!(a.starts_with("field_"));
        assert_ne!(a, b);
    }

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id("step"), "step_1");
        assert_eq!(ids.next_id("field"), "field_2");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = FieldId::new("f1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"f1\"");
        assert_eq!(id, "f1");
    }
}
