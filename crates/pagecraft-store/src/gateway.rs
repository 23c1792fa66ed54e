//! Persistence gateway seam

use std::sync::Arc;

use async_trait::async_trait;
use pagecraft_model::DocumentId;
use pagecraft_tree::Node;

use crate::error::GatewayError;

/// Load, save and delete raw documents by id
///
/// Gateways move plain trees; normalization happens above them.
#[async_trait]
pub trait PersistenceGateway: Send + Sync {
    /// Raw document stored under `id`
    ///
    /// # Errors
    /// [`GatewayError::NotFound`] when nothing is stored, or a backend error
    async fn load(&self, id: &DocumentId) -> Result<Node, GatewayError>;

    /// Store `doc` under `id`, replacing any previous value
    ///
    /// # Errors
    /// Returns error if the backend rejects the write
    async fn save(&self, id: &DocumentId, doc: &Node) -> Result<(), GatewayError>;

    /// Remove whatever is stored under `id`; missing ids are not an error
    ///
    /// # Errors
    /// Returns error if the backend rejects the delete
    async fn delete(&self, id: &DocumentId) -> Result<(), GatewayError>;
}

#[async_trait]
impl<G: PersistenceGateway + ?Sized> PersistenceGateway for Arc<G> {
    async fn load(&self, id: &DocumentId) -> Result<Node, GatewayError> {
        (**self).load(id).await
    }

    async fn save(&self, id: &DocumentId, doc: &Node) -> Result<(), GatewayError> {
        (**self).save(id, doc).await
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), GatewayError> {
        (**self).delete(id).await
    }
}

/// Serialized size of `doc`, or [`GatewayError::TooLarge`] above `max_bytes`
///
/// # Errors
/// [`GatewayError::TooLarge`] over the ceiling, [`GatewayError::Serialization`]
/// if the tree does not serialize
pub fn ensure_within_ceiling(doc: &Node, max_bytes: usize) -> Result<usize, GatewayError> {
    let size = serde_json::to_vec(doc)?.len();
    if size > max_bytes {
        return Err(GatewayError::TooLarge {
            size,
            max: max_bytes,
        });
    }
    Ok(size)
}
