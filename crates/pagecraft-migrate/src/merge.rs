//! Deep fill of missing values from defaults

use std::sync::Arc;

use pagecraft_tree::Node;

/// Fill absent or `null` members of `target` from `defaults`, recursively
///
/// Objects merge key by key; arrays and scalars present in `target` are
/// kept as they are. Returns `target` itself (same allocation) when
/// nothing was missing.
#[must_use]
pub fn fill_missing(target: &Node, defaults: &Node) -> Node {
    match (target, defaults) {
        (Node::Null, _) => defaults.clone(),
        (Node::Object(have), Node::Object(want)) => {
            let mut next = None;
            for (key, default) in want.iter() {
                let current = have.get(key);
                let filled = match current {
                    None => default.clone(),
                    Some(value) => fill_missing(value, default),
                };
                if current.is_some_and(|value| value.same_ref(&filled)) {
                    continue;
                }
                next.get_or_insert_with(|| (**have).clone())
                    .insert(key.clone(), filled);
            }
            next.map_or_else(|| target.clone(), |members| Node::Object(Arc::new(members)))
        }
        _ => target.clone(),
    }
}
