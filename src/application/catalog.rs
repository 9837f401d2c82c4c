//! The cached catalog reader.
//!
//! Every storefront read shape goes through here: a hit returns the shared
//! snapshot, a miss reads the store once and memoizes the result for the
//! shape's TTL class. A failed store read propagates as
//! [`StoreError::Unavailable`](crate::application::store::StoreError) — an
//! expired snapshot is never served in its place, and storefront callers
//! degrade to an empty state.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::store::{CategoryStore, ProductStore};
use crate::cache::CatalogCache;
use crate::config::StorefrontSettings;
use crate::domain::entities::{CategoryRecord, ProductRecord};

pub struct CatalogService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    cache: Arc<CatalogCache>,
    featured_limit: usize,
    related_limit: usize,
}

impl CatalogService {
    pub fn new(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        cache: Arc<CatalogCache>,
        storefront: &StorefrontSettings,
    ) -> Self {
        Self {
            products,
            categories,
            cache,
            featured_limit: storefront.featured_limit,
            related_limit: storefront.related_limit,
        }
    }

    pub fn cache(&self) -> &Arc<CatalogCache> {
        &self.cache
    }

    /// All categories, for navigation and filter chips.
    pub async fn categories(&self) -> Result<Arc<Vec<CategoryRecord>>, AppError> {
        let store = self.categories.clone();
        self.cache
            .categories(move || async move { store.list_all().await })
            .await
            .map_err(AppError::from)
    }

    /// The landing-page featured strip, capped small.
    pub async fn featured_products(&self) -> Result<Arc<Vec<ProductRecord>>, AppError> {
        let store = self.products.clone();
        let limit = self.featured_limit;
        self.cache
            .featured_products(move || async move { store.list_all(Some(limit)).await })
            .await
            .map_err(AppError::from)
    }

    /// One product by id. `None` means the id is unknown, which is itself
    /// memoized; store failures surface as errors instead.
    pub async fn product_by_id(&self, id: Uuid) -> Result<Option<ProductRecord>, AppError> {
        let store = self.products.clone();
        let record = self
            .cache
            .product_by_id(id, move || async move { store.get(id).await })
            .await?;
        Ok(record.as_ref().clone())
    }

    /// One category by id.
    pub async fn category_by_id(&self, id: Uuid) -> Result<Option<CategoryRecord>, AppError> {
        let store = self.categories.clone();
        let record = self
            .cache
            .category_by_id(id, move || async move { store.get(id).await })
            .await?;
        Ok(record.as_ref().clone())
    }

    /// The capped related-products strip for a product detail page.
    pub async fn products_by_category(
        &self,
        category_id: Uuid,
    ) -> Result<Arc<Vec<ProductRecord>>, AppError> {
        let store = self.products.clone();
        let limit = self.related_limit;
        self.cache
            .products_by_category(category_id, move || async move {
                store.list_by_category(category_id, Some(limit)).await
            })
            .await
            .map_err(AppError::from)
    }

    /// The full catalog snapshot backing search, browse, and admin
    /// inventory. The heaviest store read, and the one whose reuse matters
    /// most: every filter/page permutation downstream works off this single
    /// cached fetch.
    pub async fn all_products(&self) -> Result<Arc<Vec<ProductRecord>>, AppError> {
        let store = self.products.clone();
        self.cache
            .full_catalog(move || async move { store.list_all(None).await })
            .await
            .map_err(AppError::from)
    }
}
