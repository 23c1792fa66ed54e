//! Testing utilities for the Pagecraft workspace
//!
//! Shared fixtures, in-memory fakes and tracing setup.

#![allow(missing_docs)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use pagecraft_migrate::{default_document, normalize};
use pagecraft_model::{ConfigDocument, DocumentId};
use pagecraft_store::{AssetBlob, AssetUploader, GatewayError, PersistenceGateway, UploadError};
use pagecraft_tree::Node;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

/// Install a test subscriber honouring `RUST_LOG`; repeated calls are no-ops
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_test_writer()
        .try_init();
}

/// Document in the current shape with a two-step flow
pub fn sample_value() -> Value {
    json!({
        "id": "sample",
        "title": "Spring promo",
        "theme": {"primaryColor": "#0ea5e9", "secondaryColor": "#0f172a"},
        "hero": {
            "isShow": true,
            "headline": "Hello",
            "subHeadline": "World",
            "ctaText": "Apply",
            "size": "md"
        },
        "banners": [{
            "id": "b1", "isShow": true, "text": "Call now", "backgroundColor": "#1e293b",
            "textColor": "#ffffff", "position": "bottom", "size": "md", "targetBlockId": "d1"
        }],
        "detailContent": [
            {"id": "d1", "type": "image", "content": "https://cdn.example/1.png"},
            {"id": "d2", "type": "text", "content": "<p>About us</p>"}
        ],
        "formConfig": {
            "title": "Apply",
            "subTitle": "",
            "submitButtonText": "Send",
            "fields": [
                {"id": "name", "label": "Name", "type": "text", "required": true},
                {"id": "phone", "label": "Phone", "type": "tel", "required": true},
                {"id": "plan", "label": "Plan", "type": "select", "required": false,
                 "options": [{"value": "a", "label": "Basic"}, {"value": "b", "label": "Pro"}]}
            ],
            "showPrivacyPolicy": true
        },
        "footer": {"isShow": true, "images": [], "copyrightText": "(c) Example"},
        "steps": [
            {"id": "s1", "type": "intro", "title": "Welcome", "contentId": "d2"},
            {"id": "s2", "type": "form", "title": "Details", "fieldIds": ["name", "phone"],
             "fieldOverrides": {"phone": {"placeholder": "010-0000-0000"}}},
            {"id": "s3", "type": "outro", "title": "Done"}
        ]
    })
}

/// [`sample_value`] as a tree
pub fn sample_raw() -> Node {
    Node::from(sample_value())
}

/// [`sample_value`] normalized
pub fn sample_document() -> ConfigDocument {
    normalize(&sample_raw(), &default_document("sample")).unwrap()
}

/// Document in the historical shape: lone banner, image list, flat social
/// links and fields without ids
pub fn legacy_raw() -> Node {
    Node::from(json!({
        "id": "legacy",
        "title": "Old page",
        "banner": {"text": "Call us"},
        "detailImages": ["https://cdn.example/a.png", "https://youtu.be/abc"],
        "hero": {"headline": "Old headline"},
        "formConfig": {
            "title": "Contact",
            "fields": [
                {"label": "Name", "type": "text", "required": true},
                {"label": "Mood", "type": "emoji"}
            ]
        },
        "snsConfig": {"isShow": true, "instagram": "https://instagram.com/example"}
    }))
}

/// Remote store fake with call counters and switchable failure
#[derive(Debug, Default)]
pub struct FakeRemote {
    docs: DashMap<DocumentId, Node>,
    loads: AtomicUsize,
    saves: AtomicUsize,
    offline: AtomicBool,
}

impl FakeRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fake seeded with one document
    pub fn with_document(id: &str, doc: Node) -> Self {
        let remote = Self::new();
        remote.docs.insert(DocumentId::new(id), doc);
        remote
    }

    /// Loads that reached this fake
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    /// Saves that reached this fake
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Stored document, bypassing counters
    pub fn stored(&self, id: &str) -> Option<Node> {
        self.docs.get(&DocumentId::new(id)).map(|entry| entry.value().clone())
    }

    /// Make every call fail with a backend error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn check_online(&self) -> Result<(), GatewayError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(GatewayError::Backend("remote unavailable".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl PersistenceGateway for FakeRemote {
    async fn load(&self, id: &DocumentId) -> Result<Node, GatewayError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.stored(id.as_str()).ok_or_else(|| GatewayError::NotFound(id.clone()))
    }

    async fn save(&self, id: &DocumentId, doc: &Node) -> Result<(), GatewayError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.check_online()?;
        self.docs.insert(id.clone(), doc.clone());
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), GatewayError> {
        self.check_online()?;
        self.docs.remove(id);
        Ok(())
    }
}

/// Uploader fake serving images from `https://cdn.test/`
#[derive(Debug)]
pub struct FakeUploader {
    max_bytes: usize,
    uploaded: DashMap<String, usize>,
    counter: AtomicUsize,
}

impl FakeUploader {
    pub fn new(max_bytes: usize) -> Self {
        Self {
            max_bytes,
            uploaded: DashMap::new(),
            counter: AtomicUsize::new(0),
        }
    }

    /// Number of successful uploads
    pub fn upload_count(&self) -> usize {
        self.uploaded.len()
    }
}

impl Default for FakeUploader {
    fn default() -> Self {
        Self::new(1024 * 1024)
    }
}

#[async_trait]
impl AssetUploader for FakeUploader {
    async fn upload(&self, blob: AssetBlob) -> Result<String, UploadError> {
        if !blob.is_image() {
            return Err(UploadError::UnsupportedType(blob.content_type));
        }
        if blob.len() > self.max_bytes {
            return Err(UploadError::TooLarge {
                size: blob.len(),
                max: self.max_bytes,
            });
        }
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let url = format!("https://cdn.test/{n}/{}", blob.file_name);
        self.uploaded.insert(url.clone(), blob.len());
        Ok(url)
    }
}
