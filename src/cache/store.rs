//! The process-wide catalog cache.
//!
//! One typed section per query shape, each with its own TTL class. Sections
//! expire independently; invalidation clears them together. Constructed once
//! at startup and injected into the services that need it — tests get a
//! fresh instance per case and an explicit [`CatalogCache::clear`].

use std::future::Future;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::entities::{CategoryRecord, ProductRecord};

use super::config::CacheConfig;
use super::entry::{TtlCell, TtlMap};
use super::keys::CacheShape;

pub struct CatalogCache {
    config: CacheConfig,
    categories: TtlCell<Vec<CategoryRecord>>,
    featured: TtlCell<Vec<ProductRecord>>,
    catalog: TtlCell<Vec<ProductRecord>>,
    // Missing ids memoize `None` for the same TTL as present ones.
    products_by_id: TtlMap<Uuid, Option<ProductRecord>>,
    categories_by_id: TtlMap<Uuid, Option<CategoryRecord>>,
    related_by_category: TtlMap<Uuid, Vec<ProductRecord>>,
}

impl CatalogCache {
    pub fn new(config: CacheConfig) -> Self {
        let single_flight = config.single_flight;
        Self {
            categories: TtlCell::new(single_flight),
            featured: TtlCell::new(single_flight),
            catalog: TtlCell::new(single_flight),
            products_by_id: TtlMap::new(config.product_limit_non_zero(), single_flight),
            categories_by_id: TtlMap::new(config.category_limit_non_zero(), single_flight),
            related_by_category: TtlMap::new(config.related_limit_non_zero(), single_flight),
            config,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub async fn categories<F, Fut, E>(&self, compute: F) -> Result<Arc<Vec<CategoryRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<CategoryRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.categories
            .get_or_compute(
                CacheShape::CategoryList,
                self.config.category_list_ttl(),
                compute,
            )
            .await
    }

    pub async fn featured_products<F, Fut, E>(
        &self,
        compute: F,
    ) -> Result<Arc<Vec<ProductRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ProductRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.featured
            .get_or_compute(
                CacheShape::FeaturedProducts,
                self.config.featured_ttl(),
                compute,
            )
            .await
    }

    pub async fn full_catalog<F, Fut, E>(&self, compute: F) -> Result<Arc<Vec<ProductRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ProductRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.catalog
            .get_or_compute(CacheShape::FullCatalog, self.config.catalog_ttl(), compute)
            .await
    }

    pub async fn product_by_id<F, Fut, E>(
        &self,
        id: Uuid,
        compute: F,
    ) -> Result<Arc<Option<ProductRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<ProductRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.products_by_id
            .get_or_compute(
                CacheShape::ProductById(id),
                id,
                self.config.product_ttl(),
                compute,
            )
            .await
    }

    pub async fn category_by_id<F, Fut, E>(
        &self,
        id: Uuid,
        compute: F,
    ) -> Result<Arc<Option<CategoryRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Option<CategoryRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.categories_by_id
            .get_or_compute(
                CacheShape::CategoryById(id),
                id,
                self.config.category_ttl(),
                compute,
            )
            .await
    }

    pub async fn products_by_category<F, Fut, E>(
        &self,
        category_id: Uuid,
        compute: F,
    ) -> Result<Arc<Vec<ProductRecord>>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<ProductRecord>, E>>,
    {
        if !self.config.enabled {
            return Ok(Arc::new(compute().await?));
        }
        self.related_by_category
            .get_or_compute(
                CacheShape::ProductsByCategory(category_id),
                category_id,
                self.config.related_ttl(),
                compute,
            )
            .await
    }

    /// Drop every memoized entry across all sections.
    pub fn clear(&self) {
        self.categories.invalidate();
        self.featured.invalidate();
        self.catalog.invalidate();
        self.products_by_id.invalidate_all();
        self.categories_by_id.invalidate_all();
        self.related_by_category.invalidate_all();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    fn counting<T>(
        calls: &AtomicUsize,
        value: T,
    ) -> impl FnOnce() -> std::future::Ready<Result<T, std::convert::Infallible>> {
        move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(Ok(value))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn clear_empties_every_section() {
        let cache = CatalogCache::new(CacheConfig::default());
        let calls = AtomicUsize::new(0);
        let id = Uuid::new_v4();

        cache
            .categories(counting(&calls, Vec::new()))
            .await
            .expect("categories");
        cache
            .full_catalog(counting(&calls, Vec::new()))
            .await
            .expect("catalog");
        cache
            .product_by_id(id, counting(&calls, None))
            .await
            .expect("product");
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        cache.clear();

        cache
            .categories(counting(&calls, Vec::new()))
            .await
            .expect("categories again");
        cache
            .full_catalog(counting(&calls, Vec::new()))
            .await
            .expect("catalog again");
        cache
            .product_by_id(id, counting(&calls, None))
            .await
            .expect("product again");
        assert_eq!(calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_cache_passes_every_read_through()
    {
        let cache = CatalogCache::new(CacheConfig {
            enabled: false,
            ..Default::default()
        });
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            cache
                .full_catalog(counting(&calls, Vec::new()))
                .await
                .expect("pass-through");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_product_lookup_is_memoized() {
        let cache = CatalogCache::new(CacheConfig::default());
        let calls = AtomicUsize::new(0);
        let id = Uuid::new_v4();

        for _ in 0..2 {
            let value = cache
                .product_by_id(id, counting(&calls, None))
                .await
                .expect("lookup");
            assert!(value.is_none());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
