//! Coarse cache invalidation.
//!
//! Every admin mutation ends with one broadcast that clears the whole
//! [`CatalogCache`]. The data model carries enough cross-references
//! (denormalized category slugs, category-scoped strips, the full-catalog
//! snapshot) that per-entity tracking would need a dependency graph; with
//! admin-only write volume, a wholesale sweep is the coherent policy.
//!
//! A broadcast never surfaces an error to its caller — the write it follows
//! has already committed, and the worst outcome of a skipped sweep is stale
//! data until the next natural TTL expiry.

use std::sync::Arc;

use metrics::counter;
use tracing::{debug, info};
use uuid::Uuid;

use super::store::CatalogCache;

/// Mutation kinds that trigger a sweep, recorded for observability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEvent {
    ProductUpserted { id: Uuid },
    ProductDeleted { id: Uuid },
    CategoryUpserted { id: Uuid },
    CategoryDeleted { id: Uuid },
}

pub struct InvalidationBroadcaster {
    cache: Arc<CatalogCache>,
}

impl InvalidationBroadcaster {
    pub fn new(cache: Arc<CatalogCache>) -> Self {
        Self { cache }
    }

    /// Clear every cached read shape in response to `event`.
    ///
    /// The next read of ANY shape after this call is a full miss.
    pub fn broadcast(&self, event: CatalogEvent) {
        if !self.cache.config().enabled {
            debug!(event = ?event, "Invalidation skipped: cache disabled");
            return;
        }

        info!(event = ?event, "Catalog changed; clearing all cached read shapes");
        self.cache.clear();
        counter!("vetrina_cache_invalidate_total").increment(1);
    }

    pub fn product_upserted(&self, id: Uuid) {
        self.broadcast(CatalogEvent::ProductUpserted { id });
    }

    pub fn product_deleted(&self, id: Uuid) {
        self.broadcast(CatalogEvent::ProductDeleted { id });
    }

    pub fn category_upserted(&self, id: Uuid) {
        self.broadcast(CatalogEvent::CategoryUpserted { id });
    }

    pub fn category_deleted(&self, id: Uuid) {
        self.broadcast(CatalogEvent::CategoryDeleted { id });
    }
}
