//! Path-addressed immutable updates
//!
//! Every operation takes a borrowed tree and returns a new one. Only the
//! containers on the addressed path are copied, and each copy is shallow:
//! siblings of the path keep their original allocation.

use std::sync::Arc;

use crate::node::Node;
use crate::path::{DocPath, PathError, Segment};

/// Most `null` slots a single write may add past the end of an array
pub const MAX_ARRAY_PADDING: usize = 1024;

/// Replace the value at `path`, creating containers for absent nodes
///
/// Absent or `null` intermediates become an empty array when the next
/// segment is an index and an empty object otherwise. Writing past the end
/// of an array pads the gap with `null`, up to [`MAX_ARRAY_PADDING`] slots.
/// An index segment applied to an object is used as the string key.
///
/// # Errors
/// - [`PathError::EmptyPath`] if `path` is the root
/// - [`PathError::TypeMismatch`] if a key meets an array or any segment
///   meets a scalar
/// - [`PathError::IndexOutOfRange`] if an index would need more padding
///   than [`MAX_ARRAY_PADDING`]
pub fn set(root: &Node, path: &DocPath, value: Node) -> Result<Node, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    set_at(Some(root), path, 0, value)
}

/// Apply `f` to the value at `path` and store the result there
///
/// `f` receives `None` when the target does not exist yet.
///
/// # Errors
/// Same as [`set`].
pub fn update<F>(root: &Node, path: &DocPath, f: F) -> Result<Node, PathError>
where
    F: FnOnce(Option<&Node>) -> Node,
{
    let next = f(get(root, path));
    set(root, path, next)
}

/// Look up the value at `path`
///
/// Index segments also match object keys, mirroring [`set`].
#[must_use]
pub fn get<'a>(root: &'a Node, path: &DocPath) -> Option<&'a Node> {
    path.iter().try_fold(root, |node, segment| match (node, segment) {
        (Node::Object(members), segment) => members.get(segment.as_key().as_ref()),
        (Node::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    })
}

/// Remove the value at `path`
///
/// Object members are removed keeping the order of the rest; array items
/// shift down. A target that does not exist leaves the tree untouched and
/// the returned node is the same allocation as `root`.
///
/// # Errors
/// - [`PathError::EmptyPath`] if `path` is the root
/// - [`PathError::TypeMismatch`] if an intermediate node cannot be descended
pub fn remove(root: &Node, path: &DocPath) -> Result<Node, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    Ok(remove_at(root, path, 0)?.unwrap_or_else(|| root.clone()))
}

fn set_at(current: Option<&Node>, path: &DocPath, depth: usize, value: Node) -> Result<Node, PathError> {
    let Some(segment) = path.segments().get(depth) else {
        return Ok(value);
    };

    let container = match current {
        None | Some(Node::Null) => empty_container_for(segment),
        Some(node) => node.clone(),
    };

    match (&container, segment) {
        (Node::Object(members), segment) => {
            let key = segment.as_key();
            let child = set_at(members.get(key.as_ref()), path, depth + 1, value)?;
            let mut next = (**members).clone();
            next.insert(key.into_owned(), child);
            Ok(Node::Object(Arc::new(next)))
        }
        (Node::Array(items), Segment::Index(index)) => {
            if index.saturating_sub(items.len()) > MAX_ARRAY_PADDING {
                return Err(PathError::IndexOutOfRange {
                    at: path.prefix(depth).to_string(),
                    index: *index,
                    len: items.len(),
                });
            }
            let child = set_at(items.get(*index), path, depth + 1, value)?;
            let mut next = (**items).clone();
            if *index < next.len() {
                next[*index] = child;
            } else {
                next.resize(*index, Node::Null);
                next.push(child);
            }
            Ok(Node::Array(Arc::new(next)))
        }
        (found, segment) => Err(mismatch(path, depth, segment, found)),
    }
}

/// Returns `Ok(None)` when nothing under this node changed
fn remove_at(current: &Node, path: &DocPath, depth: usize) -> Result<Option<Node>, PathError> {
    let segments = path.segments();
    let Some(segment) = segments.get(depth) else {
        return Ok(None);
    };
    let terminal = depth + 1 == segments.len();

    match (current, segment) {
        (Node::Null, _) => Ok(None),
        (Node::Object(members), segment) => {
            let key = segment.as_key();
            let Some(child) = members.get(key.as_ref()) else {
                return Ok(None);
            };
            let mut next = (**members).clone();
            if terminal {
                next.shift_remove(key.as_ref());
            } else {
                match remove_at(child, path, depth + 1)? {
                    Some(replaced) => {
                        next.insert(key.into_owned(), replaced);
                    }
                    None => return Ok(None),
                }
            }
            Ok(Some(Node::Object(Arc::new(next))))
        }
        (Node::Array(items), Segment::Index(index)) => {
            let Some(child) = items.get(*index) else {
                return Ok(None);
            };
            let mut next = (**items).clone();
            if terminal {
                next.remove(*index);
            } else {
                match remove_at(child, path, depth + 1)? {
                    Some(replaced) => next[*index] = replaced,
                    None => return Ok(None),
                }
            }
            Ok(Some(Node::Array(Arc::new(next))))
        }
        (found, segment) => Err(mismatch(path, depth, segment, found)),
    }
}

fn empty_container_for(segment: &Segment) -> Node {
    if segment.is_index() {
        Node::empty_array()
    } else {
        Node::empty_object()
    }
}

fn mismatch(path: &DocPath, depth: usize, segment: &Segment, found: &Node) -> PathError {
    PathError::TypeMismatch {
        at: path.prefix(depth).to_string(),
        expected: segment.container_kind(),
        found: found.kind(),
    }
}
