//! Gateways used through trait objects and from concurrent tasks

use std::sync::Arc;

use pagecraft_model::DocumentId;
use pagecraft_store::{ensure_within_ceiling, CachedGateway, GatewayError, MemoryDraftStore, PersistenceGateway};
use pagecraft_tree::Node;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn gateways_work_behind_trait_objects() {
    let local: Arc<dyn PersistenceGateway> = Arc::new(MemoryDraftStore::new());
    let remote: Arc<dyn PersistenceGateway> = Arc::new(CachedGateway::new(MemoryDraftStore::new()));
    let id = DocumentId::new("landing");
    let doc = Node::from(json!({"id": "landing", "title": "Hi"}));

    for gateway in [&local, &remote] {
        gateway.save(&id, &doc).await.unwrap();
        assert_eq!(gateway.load(&id).await.unwrap(), doc);
    }
}

#[tokio::test]
async fn concurrent_drafts_do_not_interfere() {
    let store = Arc::new(MemoryDraftStore::new());
    let mut handles = Vec::new();
    for n in 0..16 {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let id = DocumentId::new(format!("doc-{n}"));
            store.save(&id, &Node::from(json!({"n": n}))).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.len(), 16);
    let doc = store.load(&DocumentId::new("doc-7")).await.unwrap();
    assert_eq!(doc.to_value(), json!({"n": 7}));
}

#[tokio::test]
async fn ceiling_guards_save() {
    let doc = Node::from(json!({"body": "x".repeat(50_000)}));
    match ensure_within_ceiling(&doc, 46_080) {
        Err(GatewayError::TooLarge { size, max }) => {
            assert!(size > max);
            assert_eq!(max, 46_080);
        }
        other => panic!("expected TooLarge, got {other:?}"),
    }
}
