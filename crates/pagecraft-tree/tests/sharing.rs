//! Structural sharing properties of path mutation

use pagecraft_tree::{get, set, DocPath, Node, Segment};
use proptest::prelude::*;

fn arb_node() -> impl Strategy<Value = Node> {
    let leaf = prop_oneof![
        Just(Node::Null),
        any::<bool>().prop_map(Node::from),
        any::<i64>().prop_map(Node::from),
        "[a-z]{0,8}".prop_map(Node::from),
    ];
    leaf.prop_recursive(4, 64, 6, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Node::array),
            prop::collection::vec(("[a-c]{1,2}", inner), 0..6).prop_map(Node::object),
        ]
    })
}

fn arb_path() -> impl Strategy<Value = DocPath> {
    prop::collection::vec(
        prop_oneof![
            "[a-c]{1,2}".prop_map(Segment::Key),
            (0usize..4).prop_map(Segment::Index),
        ],
        1..5,
    )
    .prop_map(DocPath::from)
}

/// Walk `old` and `new` along `path`, checking that every sibling of the
/// path is the same allocation in both trees.
fn assert_siblings_shared(old: &Node, new: &Node, path: &DocPath) {
    let mut old = old;
    let mut new = new;
    for segment in path.iter() {
        match (old, new) {
            (Node::Object(before), Node::Object(after)) => {
                let key = segment.as_key();
                for (name, child) in before.iter() {
                    if name.as_str() != key.as_ref() {
                        assert!(after[name.as_str()].same_ref(child), "member {name} was copied");
                    }
                }
                match (before.get(key.as_ref()), after.get(key.as_ref())) {
                    (Some(b), Some(a)) => {
                        old = b;
                        new = a;
                    }
                    _ => return,
                }
            }
            (Node::Array(before), Node::Array(after)) => {
                let Segment::Index(index) = segment else { return };
                for (i, child) in before.iter().enumerate() {
                    if i != *index {
                        assert!(after[i].same_ref(child), "item {i} was copied");
                    }
                }
                match (before.get(*index), after.get(*index)) {
                    (Some(b), Some(a)) => {
                        old = b;
                        new = a;
                    }
                    _ => return,
                }
            }
            _ => return,
        }
    }
}

proptest! {
    #[test]
    fn set_shares_every_subtree_off_the_path(doc in arb_node(), path in arb_path(), leaf in arb_node()) {
        let before = doc.to_value();
        if let Ok(next) = set(&doc, &path, leaf.clone()) {
            prop_assert_eq!(get(&next, &path), Some(&leaf));
            prop_assert_eq!(doc.to_value(), before);
            assert_siblings_shared(&doc, &next, &path);
        }
    }

    #[test]
    fn set_is_deterministic(doc in arb_node(), path in arb_path(), leaf in arb_node()) {
        let a = set(&doc, &path, leaf.clone());
        let b = set(&doc, &path, leaf);
        prop_assert_eq!(a, b);
    }
}
