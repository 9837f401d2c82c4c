//! Cache key definitions.
//!
//! One [`CacheShape`] per distinct read query. The shape renders to a stable
//! key string used in logs, and to a static label used for metrics (the
//! label drops the id so counter cardinality stays bounded).

use uuid::Uuid;

/// Identifies a cached query shape together with its parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheShape {
    /// All categories, for navigation and filters.
    CategoryList,
    /// The small featured strip on the landing page.
    FeaturedProducts,
    /// A single product looked up by id.
    ProductById(Uuid),
    /// A single category looked up by id.
    CategoryById(Uuid),
    /// The capped related-products strip for one category.
    ProductsByCategory(Uuid),
    /// The full catalog used for search, browse, and admin inventory.
    FullCatalog,
}

impl CacheShape {
    /// Stable key string identifying the exact entry.
    pub fn key(&self) -> String {
        match self {
            Self::CategoryList => "categories:list".to_string(),
            Self::FeaturedProducts => "products:featured".to_string(),
            Self::ProductById(id) => format!("product:{id}"),
            Self::CategoryById(id) => format!("category:{id}"),
            Self::ProductsByCategory(id) => format!("products:byCategory:{id}"),
            Self::FullCatalog => "products:catalog".to_string(),
        }
    }

    /// Static label for metrics; parameterized shapes collapse to one label.
    pub fn metric_label(&self) -> &'static str {
        match self {
            Self::CategoryList => "categories:list",
            Self::FeaturedProducts => "products:featured",
            Self::ProductById(_) => "product",
            Self::CategoryById(_) => "category",
            Self::ProductsByCategory(_) => "products:byCategory",
            Self::FullCatalog => "products:catalog",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_strings_are_stable() {
        let id = Uuid::nil();
        assert_eq!(CacheShape::CategoryList.key(), "categories:list");
        assert_eq!(CacheShape::FeaturedProducts.key(), "products:featured");
        assert_eq!(
            CacheShape::ProductById(id).key(),
            format!("product:{id}")
        );
        assert_eq!(
            CacheShape::ProductsByCategory(id).key(),
            format!("products:byCategory:{id}")
        );
        assert_eq!(CacheShape::FullCatalog.key(), "products:catalog");
    }

    #[test]
    fn parameterized_shapes_share_a_metric_label() {
        let a = CacheShape::ProductById(Uuid::new_v4());
        let b = CacheShape::ProductById(Uuid::new_v4());
        assert_eq!(a.metric_label(), b.metric_label());
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn shape_equality_includes_parameters() {
        let id = Uuid::new_v4();
        assert_eq!(CacheShape::ProductById(id), CacheShape::ProductById(id));
        assert_ne!(
            CacheShape::ProductById(id),
            CacheShape::CategoryById(id)
        );
    }
}
