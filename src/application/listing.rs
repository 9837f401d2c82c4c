//! In-memory listing composition over the cached catalog snapshot.
//!
//! Every view here is a pure function of one cached bulk fetch plus the
//! request parameters: filtering, sorting, and page slicing happen in
//! memory, so turning a page or refining a search never touches the backing
//! store again. The only non-determinism is the shuffled browse view, which
//! reshuffles per request AFTER the cached fetch so no single ordering is
//! ever memoized and replayed to every shopper.

use std::sync::Arc;

use rand::seq::SliceRandom;
use uuid::Uuid;

use crate::application::catalog::CatalogService;
use crate::application::error::AppError;
use crate::config::{AdminSettings, StorefrontSettings};
use crate::domain::entities::ProductRecord;
use crate::domain::types::{InventorySort, InventorySortField, SortDirection};

/// Storefront listing request.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    /// Case-insensitive substring over name and description.
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    /// 1-based page number; zero is treated as the first page.
    pub page: usize,
}

#[derive(Debug, Clone)]
pub struct ListingPage {
    pub items: Vec<ProductRecord>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// One admin inventory row with the owning category resolved.
#[derive(Debug, Clone)]
pub struct InventoryRow {
    pub product: ProductRecord,
    /// `None` when the product's category was deleted; callers render an
    /// "uncategorized" label, never an error.
    pub category_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct InventoryPage {
    pub rows: Vec<InventoryRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total_count: usize,
}

/// One page of the shuffled browse view.
#[derive(Debug, Clone)]
pub struct ShuffledPage {
    pub items: Vec<ProductRecord>,
    /// Tail slice of the same shuffle, shown as a recommendation strip.
    pub recommended: Vec<ProductRecord>,
    pub page: usize,
    pub total_pages: usize,
}

pub struct ListingComposer {
    catalog: Arc<CatalogService>,
    page_size: usize,
    admin_page_size: usize,
    recommended_limit: usize,
}

impl ListingComposer {
    pub fn new(
        catalog: Arc<CatalogService>,
        storefront: &StorefrontSettings,
        admin: &AdminSettings,
    ) -> Self {
        Self {
            catalog,
            page_size: storefront.page_size,
            admin_page_size: admin.page_size,
            recommended_limit: storefront.recommended_limit,
        }
    }

    /// Filtered, paged storefront listing.
    ///
    /// Filter order: substring search, then category equality, then fixed
    /// page slicing. Identical arguments over an unchanged snapshot return
    /// identical results.
    pub async fn list(&self, query: &ListingQuery) -> Result<ListingPage, AppError> {
        let snapshot = self.catalog.all_products().await?;

        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);

        let filtered: Vec<&ProductRecord> = snapshot
            .iter()
            .filter(|product| match &needle {
                Some(needle) => matches_search(product, needle),
                None => true,
            })
            .filter(|product| match query.category_id {
                Some(category_id) => product.category_id == category_id,
                None => true,
            })
            .collect();

        let total_count = filtered.len();
        let (page, total_pages, slice) = slice_page(&filtered, query.page, self.page_size);

        Ok(ListingPage {
            items: slice.iter().map(|product| (*product).clone()).collect(),
            page,
            total_pages,
            total_count,
        })
    }

    /// Sorted admin inventory with owning-category names resolved against
    /// the cached category list.
    pub async fn inventory(
        &self,
        sort: InventorySort,
        page: usize,
    ) -> Result<InventoryPage, AppError> {
        let snapshot = self.catalog.all_products().await?;
        let categories = self.catalog.categories().await?;

        let mut ordered: Vec<&ProductRecord> = snapshot.iter().collect();
        ordered.sort_by(|a, b| {
            let ordering = match sort.field {
                InventorySortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
                InventorySortField::Price => a.price.total_cmp(&b.price),
                InventorySortField::Stock => a.stock.cmp(&b.stock),
            };
            match sort.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        let total_count = ordered.len();
        let (page, total_pages, slice) = slice_page(&ordered, page, self.admin_page_size);

        let rows = slice
            .iter()
            .map(|product| InventoryRow {
                product: (*product).clone(),
                category_name: categories
                    .iter()
                    .find(|category| category.id == product.category_id)
                    .map(|category| category.name.clone()),
            })
            .collect();

        Ok(InventoryPage {
            rows,
            page,
            total_pages,
            total_count,
        })
    }

    /// Shuffled catalog browse: a fresh Fisher–Yates pass per request over
    /// the cached snapshot, plus a recommendation tail from the same pass.
    pub async fn browse_shuffled(&self, page: usize) -> Result<ShuffledPage, AppError> {
        let snapshot = self.catalog.all_products().await?;

        let mut shuffled: Vec<ProductRecord> = snapshot.as_ref().clone();
        shuffled.shuffle(&mut rand::thread_rng());

        let recommended = shuffled
            .iter()
            .rev()
            .take(self.recommended_limit)
            .cloned()
            .collect();

        let refs: Vec<&ProductRecord> = shuffled.iter().collect();
        let (page, total_pages, slice) = slice_page(&refs, page, self.page_size);

        Ok(ShuffledPage {
            items: slice.iter().map(|product| (*product).clone()).collect(),
            recommended,
            page,
            total_pages,
        })
    }
}

fn matches_search(product: &ProductRecord, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

/// Clamp `page` to 1-based bounds and slice out its window.
fn slice_page<'a, T>(items: &'a [T], page: usize, page_size: usize) -> (usize, usize, &'a [T]) {
    if page_size == 0 {
        return (1, 0, &[]);
    }

    let total_pages = items.len().div_ceil(page_size);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size);
    let end = start.saturating_add(page_size).min(items.len());
    let slice = if start >= items.len() {
        &[] as &[T]
    } else {
        &items[start..end]
    };
    (page, total_pages, slice)
}
