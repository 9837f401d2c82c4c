//! Cursor pagination for category product listings.
//!
//! A cursor is an opaque pointer at the last product the previous page
//! returned. Resolution fetches that record back from the store before
//! computing the next price-ordered page, so a page boundary survives the
//! ordering definition — though not concurrent inserts, an accepted
//! tradeoff. These reads bypass the cache: cursors are too high-cardinality
//! to memoize usefully, and the calling pages are cached themselves.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::store::ProductStore;
use crate::domain::entities::ProductRecord;

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct ProductCursorPayload {
    id: Uuid,
}

/// Opaque pointer at the last product of a returned page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductCursor {
    id: Uuid,
}

impl ProductCursor {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn encode(&self) -> String {
        let payload = ProductCursorPayload { id: self.id };
        let serialized = serde_json::to_vec(&payload)
            .expect("serializing product cursor payload should succeed");
        URL_SAFE_NO_PAD.encode(serialized)
    }

    pub fn decode(cursor: &str) -> Result<Self, PaginationError> {
        let bytes = URL_SAFE_NO_PAD
            .decode(cursor)
            .map_err(|err| PaginationError::InvalidCursor(err.to_string()))?;
        let payload: ProductCursorPayload = serde_json::from_slice(&bytes)
            .map_err(|err| PaginationError::InvalidCursor(err.to_string()))?;
        Ok(Self { id: payload.id })
    }
}

#[derive(Debug, Error)]
pub enum PaginationError {
    #[error("invalid cursor: {0}")]
    InvalidCursor(String),
    /// The record a cursor pointed at was deleted between pages. Callers
    /// restart from the first page; they never skip silently.
    #[error("cursor references product `{id}` which no longer exists")]
    CursorStale { id: Uuid },
}

/// One resolved page plus the cursor for the next one.
#[derive(Debug, Clone, Serialize)]
pub struct CursorPage<T> {
    pub items: Vec<T>,
    /// Present iff the page came back full. A full page does not prove more
    /// data exists — callers confirm with one further fetch and treat zero
    /// results as the true end.
    pub next_cursor: Option<String>,
}

impl<T> CursorPage<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            next_cursor: None,
        }
    }

    pub fn new(items: Vec<T>, next_cursor: Option<String>) -> Self {
        Self { items, next_cursor }
    }
}

/// Resolves "load more" requests for a category, ordered by price descending.
pub struct PageResolver {
    products: Arc<dyn ProductStore>,
}

impl PageResolver {
    pub fn new(products: Arc<dyn ProductStore>) -> Self {
        Self { products }
    }

    /// Fetch the next `page_size` products of `category_id` past `cursor`.
    pub async fn resolve_page(
        &self,
        category_id: Uuid,
        cursor: Option<&str>,
        page_size: usize,
    ) -> Result<CursorPage<ProductRecord>, AppError> {
        if page_size == 0 {
            return Ok(CursorPage::empty());
        }

        let after = match cursor {
            None => None,
            Some(raw) => {
                let cursor = ProductCursor::decode(raw)?;
                match self.products.get(cursor.id()).await? {
                    Some(record) => Some(record),
                    None => {
                        return Err(PaginationError::CursorStale { id: cursor.id() }.into());
                    }
                }
            }
        };

        let items = self
            .products
            .list_page_by_price(category_id, after.as_ref(), page_size)
            .await?;

        let next_cursor = if items.len() == page_size {
            items
                .last()
                .map(|record| ProductCursor::new(record.id).encode())
        } else {
            None
        };

        Ok(CursorPage::new(items, next_cursor))
    }
}
