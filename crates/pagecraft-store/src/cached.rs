//! TTL-cached remote gateway using moka
//!
//! Remote reads are comparatively slow; repeated loads of the same document
//! within the TTL are served from memory. Writes go straight through and
//! drop the cached entry.

use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use pagecraft_model::DocumentId;
use pagecraft_tree::Node;
use tracing::debug;

use crate::error::GatewayError;
use crate::gateway::PersistenceGateway;

/// Default time a remote document stays cached (30 minutes)
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(30 * 60);

/// Default number of cached documents
pub const DEFAULT_CACHE_CAPACITY: u64 = 256;

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of entries in cache
    pub entry_count: u64,
}

/// Gateway wrapper caching successful loads
#[derive(Debug)]
pub struct CachedGateway<G> {
    inner: G,
    cache: Cache<DocumentId, Node>,
}

impl<G: PersistenceGateway> CachedGateway<G> {
    /// Wrap `inner` with the default capacity and TTL
    #[inline]
    #[must_use]
    pub fn new(inner: G) -> Self {
        Self::with_ttl(inner, DEFAULT_CACHE_CAPACITY, DEFAULT_CACHE_TTL)
    }

    /// Wrap `inner` with explicit capacity and time-to-live
    #[must_use]
    pub fn with_ttl(inner: G, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            cache: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
        }
    }

    /// Wrapped gateway
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Drop the cached entry for `id`
    #[inline]
    pub async fn invalidate(&self, id: &DocumentId) {
        self.cache.invalidate(id).await;
    }

    /// Drop every cached entry
    #[inline]
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    /// Whether `id` is currently cached
    #[inline]
    #[must_use]
    pub fn is_cached(&self, id: &DocumentId) -> bool {
        self.cache.contains_key(id)
    }

    /// Get cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.cache.entry_count(),
        }
    }
}

#[async_trait]
impl<G: PersistenceGateway> PersistenceGateway for CachedGateway<G> {
    async fn load(&self, id: &DocumentId) -> Result<Node, GatewayError> {
        if let Some(cached) = self.cache.get(id).await {
            debug!(document = %id, "Remote cache hit");
            return Ok(cached);
        }

        let doc = self.inner.load(id).await?;
        self.cache.insert(id.clone(), doc.clone()).await;
        Ok(doc)
    }

    async fn save(&self, id: &DocumentId, doc: &Node) -> Result<(), GatewayError> {
        self.inner.save(id, doc).await?;
        self.cache.invalidate(id).await;
        Ok(())
    }

    async fn delete(&self, id: &DocumentId) -> Result<(), GatewayError> {
        self.inner.delete(id).await?;
        self.cache.invalidate(id).await;
        Ok(())
    }
}
