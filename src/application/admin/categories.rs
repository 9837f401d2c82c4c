//! Category mutations: create, update, delete.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::store::{CategoryStore, CreateCategoryParams, StoreError, UpdateCategoryParams};
use crate::cache::InvalidationBroadcaster;
use crate::domain::entities::CategoryRecord;
use crate::domain::slug::{self, SlugAsyncError};
use crate::infra::assets::AssetStore;
use crate::infra::auth::AdminGate;

use super::NewAsset;

const ASSET_PREFIX: &str = "categories";

/// Admin form input for a new category.
#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    /// Short display glyph, e.g. an emoji.
    pub icon: String,
    pub cover: NewAsset,
}

/// Partial edit of an existing category.
#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    /// Renaming re-derives the slug. Products keep their denormalized copy
    /// of the old slug until they are next written — an accepted staleness
    /// window.
    pub name: Option<String>,
    pub icon: Option<String>,
    /// Replacement cover; the old file is deleted only after the record
    /// points at the new one.
    pub cover: Option<NewAsset>,
}

pub struct AdminCategoryService {
    gate: Arc<dyn AdminGate>,
    categories: Arc<dyn CategoryStore>,
    assets: Arc<dyn AssetStore>,
    broadcaster: Arc<InvalidationBroadcaster>,
}

impl AdminCategoryService {
    pub fn new(
        gate: Arc<dyn AdminGate>,
        categories: Arc<dyn CategoryStore>,
        assets: Arc<dyn AssetStore>,
        broadcaster: Arc<InvalidationBroadcaster>,
    ) -> Self {
        Self {
            gate,
            categories,
            assets,
            broadcaster,
        }
    }

    pub async fn create(
        &self,
        token: &str,
        input: NewCategory,
    ) -> Result<CategoryRecord, AppError> {
        self.authorize(token)?;
        if input.name.trim().is_empty() {
            return Err(AppError::validation("name must not be empty"));
        }

        let slug = self.unique_slug(&input.name, None).await?;

        let cover = self
            .assets
            .upload(&input.cover.filename, input.cover.bytes.clone(), ASSET_PREFIX)
            .await?;

        let params = CreateCategoryParams {
            name: input.name,
            slug,
            image_url: cover.url.clone(),
            icon: input.icon,
        };

        let record = match self.categories.create(params).await {
            Ok(record) => record,
            Err(err) => {
                warn!(
                    asset = %cover.url,
                    error = %err,
                    "Category write failed after upload; stored asset left orphaned"
                );
                return Err(err.into());
            }
        };

        info!(category_id = %record.id, slug = %record.slug, "Category created");
        self.broadcaster.category_upserted(record.id);
        Ok(record)
    }

    pub async fn update(
        &self,
        token: &str,
        id: Uuid,
        changes: CategoryChanges,
    ) -> Result<CategoryRecord, AppError> {
        self.authorize(token)?;

        let existing = self.categories.get(id).await?.ok_or(AppError::NotFound)?;

        let slug = match &changes.name {
            Some(name) => {
                if name.trim().is_empty() {
                    return Err(AppError::validation("name must not be empty"));
                }
                Some(self.unique_slug(name, Some(id)).await?)
            }
            None => None,
        };

        // New cover first; the old file survives until the record update
        // has committed.
        let new_cover = match &changes.cover {
            Some(cover) => Some(
                self.assets
                    .upload(&cover.filename, cover.bytes.clone(), ASSET_PREFIX)
                    .await?,
            ),
            None => None,
        };

        let params = UpdateCategoryParams {
            name: changes.name,
            slug,
            image_url: new_cover.as_ref().map(|stored| stored.url.clone()),
            icon: changes.icon,
        };

        let updated = self.categories.update(id, params).await?;

        if new_cover.is_some()
            && let Err(err) = self.assets.delete(&existing.image_url).await
        {
            warn!(
                asset = %existing.image_url,
                error = %err,
                "Failed to delete superseded category cover"
            );
        }

        info!(category_id = %updated.id, "Category updated");
        self.broadcaster.category_upserted(updated.id);
        Ok(updated)
    }

    /// Hard delete. Products referencing the category are left in place with
    /// a dangling `category_id`; listings filter them out gracefully.
    pub async fn delete(&self, token: &str, id: Uuid) -> Result<(), AppError> {
        self.authorize(token)?;

        let existing = self.categories.get(id).await?.ok_or(AppError::NotFound)?;
        self.categories.delete(id).await?;

        if let Err(err) = self.assets.delete(&existing.image_url).await {
            warn!(
                asset = %existing.image_url,
                error = %err,
                "Failed to delete cover of removed category"
            );
        }

        info!(category_id = %id, "Category deleted");
        self.broadcaster.category_deleted(id);
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<(), AppError> {
        if self.gate.is_admin(token) {
            Ok(())
        } else {
            warn!("Rejected category mutation without admin authorization");
            Err(AppError::Unauthorized)
        }
    }

    /// Derive a slug that no OTHER category holds; a rename that keeps the
    /// same slug is not a collision with itself.
    async fn unique_slug(&self, name: &str, own_id: Option<Uuid>) -> Result<String, AppError> {
        slug::generate_unique_slug_async(name, |candidate| {
            let categories = self.categories.clone();
            let candidate = candidate.to_string();
            async move {
                let holder = categories.find_by_slug(&candidate).await?;
                Ok(match holder {
                    None => true,
                    Some(record) => own_id == Some(record.id),
                })
            }
        })
        .await
        .map_err(|err: SlugAsyncError<StoreError>| match err {
            SlugAsyncError::Slug(err) => AppError::validation(err.to_string()),
            SlugAsyncError::Predicate(err) => AppError::from(err),
        })
    }
}
