//! Store traits describing the catalog's persistence seam.
//!
//! The backing store is an external collaborator: it owns durable state and
//! query primitives, never caching policy. Adapters implement these traits;
//! the bundled reference adapter lives in [`crate::infra::memory`]. No
//! transactionality beyond a single-record write is assumed anywhere.

use std::collections::BTreeMap;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{CategoryRecord, ProductRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    /// Read or write failed because the store could not be reached.
    #[error("backing store unavailable: {reason}")]
    Unavailable { reason: String },
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("record not found")]
    NotFound,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
}

impl StoreError {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Owning category reference captured at product-write time.
#[derive(Debug, Clone)]
pub struct CategoryRef {
    pub id: Uuid,
    pub slug: String,
}

#[derive(Debug, Clone)]
pub struct CreateProductParams {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Stored exactly as submitted; display fallbacks are never written here.
    pub original_price: Option<f64>,
    pub image_url: String,
    pub images: Vec<String>,
    pub category: CategoryRef,
    pub stock: u32,
    pub specifications: BTreeMap<String, String>,
}

/// Partial product update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateProductParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears a stored strike-through price.
    pub original_price: Option<Option<f64>>,
    /// Replacement gallery; the first entry becomes `image_url`.
    pub images: Option<Vec<String>>,
    pub category: Option<CategoryRef>,
    pub stock: Option<u32>,
    pub specifications: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone)]
pub struct CreateCategoryParams {
    pub name: String,
    pub slug: String,
    pub image_url: String,
    pub icon: String,
}

/// Partial category update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateCategoryParams {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub icon: Option<String>,
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    /// All products ordered by `created_at` descending, optionally capped.
    async fn list_all(&self, limit: Option<usize>) -> Result<Vec<ProductRecord>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<ProductRecord>, StoreError>;

    /// Products in one category ordered by `created_at` descending,
    /// optionally capped.
    async fn list_by_category(
        &self,
        category_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// One resumable page of a category, ordered by `price` descending.
    ///
    /// When `after` is supplied, the page starts strictly past that record's
    /// ordering position.
    async fn list_page_by_price(
        &self,
        category_id: Uuid,
        after: Option<&ProductRecord>,
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError>;

    /// Persist a new product; the store assigns id and timestamps.
    async fn create(&self, params: CreateProductParams) -> Result<ProductRecord, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, StoreError>;

    /// Synchronous hard delete; there is no soft-delete state.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<CategoryRecord>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, StoreError>;

    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, StoreError>;

    async fn update(
        &self,
        id: Uuid,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, StoreError>;

    /// Hard delete. Products referencing the category keep their dangling
    /// `category_id`; listings must tolerate the orphan.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}
