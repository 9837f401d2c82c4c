//! In-memory catalog store adapter.
//!
//! The reference implementation of the store seams: process-local maps,
//! store-assigned uuids, server-set timestamps. Useful for embedding,
//! demos, and as the test double behind the cached read path. Ordering is
//! deterministic — `created_at` descending for listings, `price` descending
//! with an id tie-break for resumable pages — so pagination can restart
//! exactly where it left off.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::store::{
    CategoryStore, CreateCategoryParams, CreateProductParams, ProductStore, StoreError,
    UpdateCategoryParams, UpdateProductParams,
};
use crate::domain::entities::{CategoryRecord, ProductRecord};

#[derive(Default)]
pub struct MemoryCatalogStore {
    products: RwLock<HashMap<Uuid, ProductRecord>>,
    categories: RwLock<HashMap<Uuid, CategoryRecord>>,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read_products(&self) -> RwLockReadGuard<'_, HashMap<Uuid, ProductRecord>> {
        self.products.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_products(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, ProductRecord>> {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn read_categories(&self) -> RwLockReadGuard<'_, HashMap<Uuid, CategoryRecord>> {
        self.categories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_categories(&self) -> RwLockWriteGuard<'_, HashMap<Uuid, CategoryRecord>> {
        self.categories
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Newest first, id as the tie-break so equal timestamps stay stable.
fn by_created_at_desc(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| a.id.cmp(&b.id))
}

/// Price descending, id ascending on ties; the resumable page order.
fn by_price_desc(a: &ProductRecord, b: &ProductRecord) -> Ordering {
    b.price
        .total_cmp(&a.price)
        .then_with(|| a.id.cmp(&b.id))
}

/// True when `record` sorts strictly past `after` under [`by_price_desc`].
fn follows_in_price_order(record: &ProductRecord, after: &ProductRecord) -> bool {
    match record.price.total_cmp(&after.price) {
        Ordering::Less => true,
        Ordering::Equal => record.id > after.id,
        Ordering::Greater => false,
    }
}

#[async_trait]
impl ProductStore for MemoryCatalogStore {
    async fn list_all(&self, limit: Option<usize>) -> Result<Vec<ProductRecord>, StoreError> {
        let mut records: Vec<ProductRecord> = self.read_products().values().cloned().collect();
        records.sort_by(by_created_at_desc);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.read_products().get(&id).cloned())
    }

    async fn list_by_category(
        &self,
        category_id: Uuid,
        limit: Option<usize>,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let mut records: Vec<ProductRecord> = self
            .read_products()
            .values()
            .filter(|record| record.category_id == category_id)
            .cloned()
            .collect();
        records.sort_by(by_created_at_desc);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    async fn list_page_by_price(
        &self,
        category_id: Uuid,
        after: Option<&ProductRecord>,
        limit: usize,
    ) -> Result<Vec<ProductRecord>, StoreError> {
        let mut records: Vec<ProductRecord> = self
            .read_products()
            .values()
            .filter(|record| record.category_id == category_id)
            .filter(|record| match after {
                Some(after) => follows_in_price_order(record, after),
                None => true,
            })
            .cloned()
            .collect();
        records.sort_by(by_price_desc);
        records.truncate(limit);
        Ok(records)
    }

    async fn create(&self, params: CreateProductParams) -> Result<ProductRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = ProductRecord {
            id: Uuid::new_v4(),
            name: params.name,
            description: params.description,
            price: params.price,
            original_price: params.original_price,
            image_url: params.image_url,
            images: params.images,
            category_id: params.category.id,
            category_slug: params.category.slug,
            stock: params.stock,
            specifications: params.specifications,
            created_at: now,
            updated_at: now,
        };
        self.write_products().insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        params: UpdateProductParams,
    ) -> Result<ProductRecord, StoreError> {
        let mut products = self.write_products();
        let record = products.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(description) = params.description {
            record.description = description;
        }
        if let Some(price) = params.price {
            record.price = price;
        }
        if let Some(original_price) = params.original_price {
            record.original_price = original_price;
        }
        if let Some(images) = params.images {
            if images.is_empty() {
                return Err(StoreError::invalid_input(
                    "a replacement gallery must not be empty",
                ));
            }
            record.image_url = images[0].clone();
            record.images = images;
        }
        if let Some(category) = params.category {
            record.category_id = category.id;
            record.category_slug = category.slug;
        }
        if let Some(stock) = params.stock {
            record.stock = stock;
        }
        if let Some(specifications) = params.specifications {
            record.specifications = specifications;
        }
        record.updated_at = OffsetDateTime::now_utc();

        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.write_products()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl CategoryStore for MemoryCatalogStore {
    async fn list_all(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        let mut records: Vec<CategoryRecord> = self.read_categories().values().cloned().collect();
        records.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(records)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(self.read_categories().get(&id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, StoreError> {
        Ok(self
            .read_categories()
            .values()
            .find(|record| record.slug == slug)
            .cloned())
    }

    async fn create(&self, params: CreateCategoryParams) -> Result<CategoryRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let record = CategoryRecord {
            id: Uuid::new_v4(),
            name: params.name,
            slug: params.slug,
            image_url: params.image_url,
            icon: params.icon,
            created_at: now,
            updated_at: now,
        };
        self.write_categories().insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        params: UpdateCategoryParams,
    ) -> Result<CategoryRecord, StoreError> {
        let mut categories = self.write_categories();
        let record = categories.get_mut(&id).ok_or(StoreError::NotFound)?;

        if let Some(name) = params.name {
            record.name = name;
        }
        if let Some(slug) = params.slug {
            record.slug = slug;
        }
        if let Some(image_url) = params.image_url {
            record.image_url = image_url;
        }
        if let Some(icon) = params.icon {
            record.icon = icon;
        }
        record.updated_at = OffsetDateTime::now_utc();

        Ok(record.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.write_categories()
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::application::store::CategoryRef;

    use super::*;

    fn product_params(name: &str, price: f64, category: &CategoryRef) -> CreateProductParams {
        CreateProductParams {
            name: name.to_string(),
            description: String::new(),
            price,
            original_price: None,
            image_url: "products/cover.jpg".to_string(),
            images: vec!["products/cover.jpg".to_string()],
            category: category.clone(),
            stock: 5,
            specifications: BTreeMap::new(),
        }
    }

    fn category_ref() -> CategoryRef {
        CategoryRef {
            id: Uuid::new_v4(),
            slug: "toys".to_string(),
        }
    }

    #[tokio::test]
    async fn list_all_is_capped_and_deterministic() {
        let store = MemoryCatalogStore::new();
        let category = category_ref();

        for n in 0..5 {
            ProductStore::create(
                &store,
                product_params(&format!("Toy {n}"), 10.0 + n as f64, &category),
            )
            .await
            .expect("create");
        }

        let all = ProductStore::list_all(&store, None).await.expect("list");
        assert_eq!(all.len(), 5);
        let again = ProductStore::list_all(&store, None).await.expect("list again");
        assert_eq!(all, again);

        let capped = ProductStore::list_all(&store, Some(2)).await.expect("capped");
        assert_eq!(capped.len(), 2);
        assert_eq!(capped.as_slice(), &all[..2]);
    }

    #[tokio::test]
    async fn price_pages_resume_without_overlap_on_ties() {
        let store = MemoryCatalogStore::new();
        let category = category_ref();

        // Three distinct prices plus a tie at 30.
        for price in [50.0, 30.0, 30.0, 10.0] {
            ProductStore::create(&store, product_params("Tied Toy", price, &category))
                .await
                .expect("create");
        }

        let first = store
            .list_page_by_price(category.id, None, 2)
            .await
            .expect("first page");
        assert_eq!(first.len(), 2);
        assert_eq!(first[0].price, 50.0);

        let second = store
            .list_page_by_price(category.id, first.last(), 2)
            .await
            .expect("second page");
        assert_eq!(second.len(), 2);

        let mut seen: Vec<Uuid> = first.iter().chain(second.iter()).map(|r| r.id).collect();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 4, "no duplicates across page boundary");
    }

    #[tokio::test]
    async fn update_missing_product_reports_not_found() {
        let store = MemoryCatalogStore::new();
        let err = ProductStore::update(&store, Uuid::new_v4(), UpdateProductParams::default())
            .await
            .expect_err("missing product");
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn partial_update_touches_only_supplied_fields() {
        let store = MemoryCatalogStore::new();
        let category = category_ref();
        let created = ProductStore::create(&store, product_params("Robot", 45.0, &category))
            .await
            .expect("create");

        let updated = ProductStore::update(
            &store,
            created.id,
            UpdateProductParams {
                price: Some(39.99),
                ..Default::default()
            },
        )
        .await
        .expect("update");

        assert_eq!(updated.price, 39.99);
        assert_eq!(updated.name, "Robot");
        assert_eq!(updated.images, created.images);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn category_slug_lookup() {
        let store = MemoryCatalogStore::new();
        CategoryStore::create(
            &store,
            CreateCategoryParams {
                name: "Board Games".to_string(),
                slug: "board-games".to_string(),
                image_url: "categories/cover.jpg".to_string(),
                icon: "🎲".to_string(),
            },
        )
        .await
        .expect("create");

        assert!(
            store
                .find_by_slug("board-games")
                .await
                .expect("lookup")
                .is_some()
        );
        assert!(store.find_by_slug("dolls").await.expect("lookup").is_none());
    }
}
