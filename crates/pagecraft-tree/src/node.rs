//! Reference-counted JSON tree
//!
//! [`Node`] mirrors `serde_json::Value`, but arrays, objects and strings sit
//! behind [`Arc`] so that successive versions of a document can share every
//! subtree that was not edited.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use indexmap::IndexMap;
use serde::de::Deserializer;
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

/// Ordered object members
pub type Members = IndexMap<String, Node>;

/// Node of a document tree
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// JSON `null`
    #[default]
    Null,
    /// JSON boolean
    Bool(bool),
    /// JSON number
    Number(Number),
    /// JSON string
    String(Arc<str>),
    /// JSON array
    Array(Arc<Vec<Node>>),
    /// JSON object, members in insertion order
    Object(Arc<Members>),
}

impl Node {
    /// Build an array node
    pub fn array(items: impl IntoIterator<Item = Node>) -> Self {
        Self::Array(Arc::new(items.into_iter().collect()))
    }

    /// Build an object node
    pub fn object<K: Into<String>>(members: impl IntoIterator<Item = (K, Node)>) -> Self {
        Self::Object(Arc::new(
            members.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        ))
    }

    /// Empty object
    #[inline]
    #[must_use]
    pub fn empty_object() -> Self {
        Self::Object(Arc::new(Members::new()))
    }

    /// Empty array
    #[inline]
    #[must_use]
    pub fn empty_array() -> Self {
        Self::Array(Arc::new(Vec::new()))
    }

    /// Short name of this node's kind, used in error messages
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
        }
    }

    /// Check for `null`
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check for an object
    #[inline]
    #[must_use]
    pub fn is_object(&self) -> bool {
        matches!(self, Self::Object(_))
    }

    /// Check for an array
    #[inline]
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Object members, if this is an object
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Members> {
        match self {
            Self::Object(members) => Some(members.as_ref()),
            _ => None,
        }
    }

    /// Array items, if this is an array
    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Self::Array(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// String contents, if this is a string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s.as_ref()),
            _ => None,
        }
    }

    /// Boolean value, if this is a boolean
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric value, if this is a number
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    /// Member lookup on an object; `None` for other kinds
    #[inline]
    #[must_use]
    pub fn get_key(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|members| members.get(key))
    }

    /// Item lookup on an array; `None` for other kinds
    #[inline]
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Node> {
        self.as_array().and_then(|items| items.get(index))
    }

    /// Whether this node and `other` are the same allocation
    ///
    /// Containers and strings compare by pointer. `null`, booleans and
    /// numbers carry no allocation and compare by value.
    #[must_use]
    pub fn same_ref(&self, other: &Node) -> bool {
        match (self, other) {
            (Self::Array(a), Self::Array(b)) => Arc::ptr_eq(a, b),
            (Self::Object(a), Self::Object(b)) => Arc::ptr_eq(a, b),
            (Self::String(a), Self::String(b)) => Arc::ptr_eq(a, b),
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            _ => false,
        }
    }

    /// Object with one member added or replaced
    ///
    /// Non-object receivers are treated as an empty object. Other members
    /// keep their allocation.
    #[must_use]
    pub fn with_member(&self, key: impl Into<String>, value: Node) -> Node {
        let mut members = self.as_object().cloned().unwrap_or_default();
        members.insert(key.into(), value);
        Node::Object(Arc::new(members))
    }

    /// Object with one member removed; returns `self` unchanged if absent
    #[must_use]
    pub fn without_member(&self, key: &str) -> Node {
        match self {
            Self::Object(members) if members.contains_key(key) => {
                let mut next = (**members).clone();
                next.shift_remove(key);
                Node::Object(Arc::new(next))
            }
            _ => self.clone(),
        }
    }

    /// Convert into a `serde_json::Value`
    #[must_use]
    pub fn to_value(&self) -> Value {
        Value::from(self)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Number(n),
            Value::String(s) => Self::String(Arc::from(s)),
            Value::Array(items) => Self::array(items.into_iter().map(Node::from)),
            Value::Object(members) => {
                Self::object(members.into_iter().map(|(k, v)| (k, Node::from(v))))
            }
        }
    }
}

impl From<&Node> for Value {
    fn from(node: &Node) -> Self {
        match node {
            Node::Null => Value::Null,
            Node::Bool(b) => Value::Bool(*b),
            Node::Number(n) => Value::Number(n.clone()),
            Node::String(s) => Value::String(s.to_string()),
            Node::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Node::Object(members) => Value::Object(
                members
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Self::String(Arc::from(s))
    }
}

impl From<bool> for Node {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Self::Number(n.into())
    }
}

impl From<u64> for Node {
    fn from(n: u64) -> Self {
        Self::Number(n.into())
    }
}

impl From<f64> for Node {
    /// Non-finite values become `null`, as JSON has no encoding for them
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Self::Null, Self::Number)
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => n.serialize(serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Object(members) => {
                let mut map = serializer.serialize_map(Some(members.len()))?;
                for (key, value) in members.iter() {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Node::from)
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}
