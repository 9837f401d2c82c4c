//! Catalog records mirrored from the backing store.

use std::collections::BTreeMap;

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// A sellable product.
///
/// `category_slug` is a denormalized copy of the owning category's slug,
/// captured when the product is written. It is not refreshed when the
/// category is renamed; readers that need the live name resolve it against
/// the category list instead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductRecord {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Current selling price. Non-negative.
    pub price: f64,
    /// Strike-through price. Present only when the admin supplied one;
    /// display code may synthesize a markup, but that figure is never stored.
    pub original_price: Option<f64>,
    /// Primary image, conventionally equal to `images[0]`.
    pub image_url: String,
    pub images: Vec<String>,
    pub category_id: Uuid,
    pub category_slug: String,
    pub stock: u32,
    pub specifications: BTreeMap<String, String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// A browsing category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRecord {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub image_url: String,
    /// Short display glyph shown next to the name.
    pub icon: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
