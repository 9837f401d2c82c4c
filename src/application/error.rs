//! Application error taxonomy.
//!
//! Storefront callers degrade on `Store(Unavailable)` — an empty "nothing
//! found" state, never a hard failure. Admin callers surface the error and
//! retry manually.

use thiserror::Error;

use crate::application::pagination::PaginationError;
use crate::application::store::StoreError;
use crate::domain::error::DomainError;
use crate::infra::assets::AssetStoreError;
use crate::infra::error::InfraError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
    #[error("asset storage failed: {0}")]
    Assets(#[from] AssetStoreError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error("admin authorization required")]
    Unauthorized,
    #[error("resource not found")]
    NotFound,
    #[error("validation failed: {0}")]
    Validation(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// True when the failure came from an unreachable backing store, the one
    /// case storefront pages render as an empty state.
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Self::Store(StoreError::Unavailable { .. }))
    }

    /// True when a pagination cursor went stale and the caller should
    /// restart from the first page.
    pub fn is_stale_cursor(&self) -> bool {
        matches!(self, Self::Pagination(PaginationError::CursorStale { .. }))
    }
}
