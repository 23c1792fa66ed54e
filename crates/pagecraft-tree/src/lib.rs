//! Pagecraft Document Tree
//!
//! Reference-counted JSON tree with path-addressed, structurally shared updates.
//!
//! # Core Concepts
//!
//! - [`Node`]: JSON value whose containers live behind `Arc`
//! - [`DocPath`]: Ordered keys and indices locating a node
//! - [`set`]: Immutable write that copies only the nodes on the path
//!
//! # Example
//!
//! ```rust
//! use pagecraft_tree::{set, get, DocPath, Node};
//!
//! let doc = Node::from(serde_json::json!({"hero": {"headline": "Hi"}, "footer": {}}));
//! let path: DocPath = "hero.headlineStyle.color".parse().unwrap();
//! let next = set(&doc, &path, Node::from("#0ea5e9")).unwrap();
//!
//! assert_eq!(get(&next, &path).and_then(Node::as_str), Some("#0ea5e9"));
//! assert!(next.get_key("footer").unwrap().same_ref(doc.get_key("footer").unwrap()));
//! ```

#![warn(unreachable_pub)]

mod mutate;
mod node;
mod path;

pub use mutate::{get, remove, set, update, MAX_ARRAY_PADDING};
pub use node::{Members, Node};
pub use path::{DocPath, PathError, Segment};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
