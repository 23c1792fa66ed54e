//! Local draft store
//!
//! Keeps unsaved edits as JSON text keyed by document id, so a reload
//! parses exactly what a browser-side draft would hold.

use async_trait::async_trait;
use dashmap::DashMap;
use pagecraft_model::DocumentId;
use pagecraft_tree::Node;
use tracing::debug;

use crate::error::GatewayError;
use crate::gateway::PersistenceGateway;

/// In-process draft store
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: DashMap<DocumentId, String>,
}

impl MemoryDraftStore {
    /// Create empty store
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored drafts
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    /// Whether no drafts are stored
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Whether a draft exists for `id`
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.drafts.contains_key(id)
    }

    /// Stored text for `id`, exactly as written
    #[must_use]
    pub fn raw_text(&self, id: &DocumentId) -> Option<String> {
        self.drafts.get(id).map(|entry| entry.value().clone())
    }

    /// Store raw text under `id` without parsing it
    pub fn put_raw_text(&self, id: DocumentId, text: impl Into<String>) {
        self.drafts.insert(id, text.into());
    }
}

#[async_trait]
impl PersistenceGateway for MemoryDraftStore {
    async fn load(&self, id: &DocumentId) -> Result<Node, GatewayError> {
        let text = self
            .raw_text(id)
            .ok_or_else(|| GatewayError::NotFound(id.clone()))?;
        let value: serde_json::Value = serde_json::from_str(&text)?;
        Ok(Node::from(value))
    }

    async fn save(&self, id: &DocumentId, doc: &Node) -> Result<(), GatewayError> {
        let text = serde_json::to_string(doc)?;
        debug!(document = %id, bytes = text.len(), "Draft stored");
        self.drafts.insert(id.clone(), text);
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), GatewayError> {
        if self.drafts.remove(id).is_some() {
            debug!(document = %id, "Draft removed");
        }
        Ok(())
    }
}
