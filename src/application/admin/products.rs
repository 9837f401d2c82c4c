//! Product mutations: create, update, delete.

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future::try_join_all;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::error::AppError;
use crate::application::store::{
    CategoryRef, CategoryStore, CreateProductParams, ProductStore, UpdateProductParams,
};
use crate::cache::InvalidationBroadcaster;
use crate::domain::entities::ProductRecord;
use crate::infra::assets::AssetStore;
use crate::infra::auth::AdminGate;

use super::NewAsset;

const ASSET_PREFIX: &str = "products";

/// Admin form input for a new product.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    /// Optional strike-through price. When absent, nothing is synthesized
    /// at write time; display code handles the fallback.
    pub original_price: Option<f64>,
    pub category_id: Uuid,
    pub stock: u32,
    /// Free-form key/value pairs; a repeated key keeps its last value.
    pub specifications: Vec<(String, String)>,
    /// At least one required; the first becomes the primary image.
    pub images: Vec<NewAsset>,
}

/// Partial edit of an existing product.
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    /// `Some(None)` clears the stored strike-through price.
    pub original_price: Option<Option<f64>>,
    pub category_id: Option<Uuid>,
    pub stock: Option<u32>,
    pub specifications: Option<Vec<(String, String)>>,
    /// Replacement gallery. The previous files are deleted only after the
    /// record points at the new ones.
    pub replacement_images: Option<Vec<NewAsset>>,
}

pub struct AdminProductService {
    gate: Arc<dyn AdminGate>,
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    assets: Arc<dyn AssetStore>,
    broadcaster: Arc<InvalidationBroadcaster>,
}

impl AdminProductService {
    pub fn new(
        gate: Arc<dyn AdminGate>,
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        assets: Arc<dyn AssetStore>,
        broadcaster: Arc<InvalidationBroadcaster>,
    ) -> Self {
        Self {
            gate,
            products,
            categories,
            assets,
            broadcaster,
        }
    }

    pub async fn create(&self, token: &str, input: NewProduct) -> Result<ProductRecord, AppError> {
        self.authorize(token)?;
        validate_name(&input.name)?;
        validate_price("price", input.price)?;
        if let Some(original) = input.original_price {
            validate_price("original price", original)?;
        }
        if input.images.is_empty() {
            return Err(AppError::validation("at least one image is required"));
        }

        let category = self
            .categories
            .get(input.category_id)
            .await?
            .ok_or_else(|| AppError::validation("selected category does not exist"))?;

        let urls = self.upload_gallery(&input.images).await?;

        let params = CreateProductParams {
            name: input.name,
            description: input.description,
            price: input.price,
            original_price: input.original_price,
            image_url: urls[0].clone(),
            images: urls.clone(),
            category: CategoryRef {
                id: category.id,
                slug: category.slug,
            },
            stock: input.stock,
            specifications: fold_specifications(input.specifications),
        };

        let record = match self.products.create(params).await {
            Ok(record) => record,
            Err(err) => {
                // The uploads already landed; the files are orphaned, not
                // retried (low-volume admin tool, logged for cleanup).
                warn!(
                    asset_count = urls.len(),
                    error = %err,
                    "Product write failed after uploads; stored assets left orphaned"
                );
                return Err(err.into());
            }
        };

        info!(product_id = %record.id, name = %record.name, "Product created");
        self.broadcaster.product_upserted(record.id);
        Ok(record)
    }

    pub async fn update(
        &self,
        token: &str,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<ProductRecord, AppError> {
        self.authorize(token)?;

        let existing = self.products.get(id).await?.ok_or(AppError::NotFound)?;

        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        if let Some(price) = changes.price {
            validate_price("price", price)?;
        }
        if let Some(Some(original)) = changes.original_price {
            validate_price("original price", original)?;
        }
        if let Some(replacement) = &changes.replacement_images
            && replacement.is_empty()
        {
            return Err(AppError::validation(
                "a replacement gallery needs at least one image",
            ));
        }

        let category = match changes.category_id {
            Some(category_id) => {
                let category = self
                    .categories
                    .get(category_id)
                    .await?
                    .ok_or_else(|| AppError::validation("selected category does not exist"))?;
                Some(CategoryRef {
                    id: category.id,
                    slug: category.slug,
                })
            }
            None => None,
        };

        // Upload the new gallery before the record switches over; the old
        // files survive until the update has committed.
        let new_urls = match &changes.replacement_images {
            Some(replacement) => Some(self.upload_gallery(replacement).await?),
            None => None,
        };

        let params = UpdateProductParams {
            name: changes.name,
            description: changes.description,
            price: changes.price,
            original_price: changes.original_price,
            images: new_urls.clone(),
            category,
            stock: changes.stock,
            specifications: changes.specifications.map(fold_specifications),
        };

        let updated = self.products.update(id, params).await?;

        if new_urls.is_some() {
            self.delete_assets(&existing.images).await;
        }

        info!(product_id = %updated.id, "Product updated");
        self.broadcaster.product_upserted(updated.id);
        Ok(updated)
    }

    pub async fn delete(&self, token: &str, id: Uuid) -> Result<(), AppError> {
        self.authorize(token)?;

        let existing = self.products.get(id).await?.ok_or(AppError::NotFound)?;
        self.products.delete(id).await?;
        self.delete_assets(&existing.images).await;

        info!(product_id = %id, "Product deleted");
        self.broadcaster.product_deleted(id);
        Ok(())
    }

    fn authorize(&self, token: &str) -> Result<(), AppError> {
        if self.gate.is_admin(token) {
            Ok(())
        } else {
            warn!("Rejected product mutation without admin authorization");
            Err(AppError::Unauthorized)
        }
    }

    async fn upload_gallery(&self, images: &[NewAsset]) -> Result<Vec<String>, AppError> {
        let uploads = try_join_all(images.iter().map(|asset| {
            self.assets
                .upload(&asset.filename, asset.bytes.clone(), ASSET_PREFIX)
        }))
        .await?;
        Ok(uploads.into_iter().map(|stored| stored.url).collect())
    }

    /// Best-effort removal of superseded files. A failed delete leaves a
    /// dangling asset behind; it is logged and not retried.
    async fn delete_assets(&self, urls: &[String]) {
        for url in urls {
            if let Err(err) = self.assets.delete(url).await {
                warn!(asset = %url, error = %err, "Failed to delete superseded asset");
            }
        }
    }
}

/// Fold form-submitted key/value pairs into the stored map; a repeated key
/// keeps the last submitted value.
fn fold_specifications(pairs: Vec<(String, String)>) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();
    for (key, value) in pairs {
        map.insert(key, value);
    }
    map
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        Err(AppError::validation("name must not be empty"))
    } else {
        Ok(())
    }
}

fn validate_price(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        Err(AppError::validation(format!(
            "{field} must be a non-negative number"
        )))
    } else {
        Ok(())
    }
}
