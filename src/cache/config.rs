//! Cache configuration.
//!
//! One TTL class per query shape, reflecting volatility against read cost:
//! categories change rarely and keep a day-long TTL; everything else holds
//! for an hour. Capacities bound the id-keyed sections with LRU eviction.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::Deserialize;

const DEFAULT_CATEGORY_LIST_TTL_SECS: u64 = 86_400;
const DEFAULT_FEATURED_TTL_SECS: u64 = 3_600;
const DEFAULT_PRODUCT_TTL_SECS: u64 = 3_600;
const DEFAULT_CATEGORY_TTL_SECS: u64 = 3_600;
const DEFAULT_RELATED_TTL_SECS: u64 = 3_600;
const DEFAULT_CATALOG_TTL_SECS: u64 = 3_600;
const DEFAULT_PRODUCT_LIMIT: usize = 500;
const DEFAULT_CATEGORY_LIMIT: usize = 100;
const DEFAULT_RELATED_LIMIT: usize = 100;

/// Cache tuning knobs from `vetrina.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Disabling turns every read into a pass-through to the store.
    pub enabled: bool,
    /// Deduplicate concurrent misses on one key into a single computation.
    pub single_flight: bool,
    /// TTL for the category list.
    pub category_list_ttl_secs: u64,
    /// TTL for the featured-products strip.
    pub featured_ttl_secs: u64,
    /// TTL for single-product lookups.
    pub product_ttl_secs: u64,
    /// TTL for single-category lookups.
    pub category_ttl_secs: u64,
    /// TTL for per-category related strips.
    pub related_ttl_secs: u64,
    /// TTL for the full catalog snapshot.
    pub catalog_ttl_secs: u64,
    /// Maximum memoized single-product entries.
    pub product_limit: usize,
    /// Maximum memoized single-category entries.
    pub category_limit: usize,
    /// Maximum memoized per-category related strips.
    pub related_limit: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            single_flight: true,
            category_list_ttl_secs: DEFAULT_CATEGORY_LIST_TTL_SECS,
            featured_ttl_secs: DEFAULT_FEATURED_TTL_SECS,
            product_ttl_secs: DEFAULT_PRODUCT_TTL_SECS,
            category_ttl_secs: DEFAULT_CATEGORY_TTL_SECS,
            related_ttl_secs: DEFAULT_RELATED_TTL_SECS,
            catalog_ttl_secs: DEFAULT_CATALOG_TTL_SECS,
            product_limit: DEFAULT_PRODUCT_LIMIT,
            category_limit: DEFAULT_CATEGORY_LIMIT,
            related_limit: DEFAULT_RELATED_LIMIT,
        }
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            single_flight: settings.single_flight,
            category_list_ttl_secs: settings.category_list_ttl_secs,
            featured_ttl_secs: settings.featured_ttl_secs,
            product_ttl_secs: settings.product_ttl_secs,
            category_ttl_secs: settings.category_ttl_secs,
            related_ttl_secs: settings.related_ttl_secs,
            catalog_ttl_secs: settings.catalog_ttl_secs,
            product_limit: settings.product_limit,
            category_limit: settings.category_limit,
            related_limit: settings.related_limit,
        }
    }
}

impl CacheConfig {
    pub fn category_list_ttl(&self) -> Duration {
        Duration::from_secs(self.category_list_ttl_secs)
    }

    pub fn featured_ttl(&self) -> Duration {
        Duration::from_secs(self.featured_ttl_secs)
    }

    pub fn product_ttl(&self) -> Duration {
        Duration::from_secs(self.product_ttl_secs)
    }

    pub fn category_ttl(&self) -> Duration {
        Duration::from_secs(self.category_ttl_secs)
    }

    pub fn related_ttl(&self) -> Duration {
        Duration::from_secs(self.related_ttl_secs)
    }

    pub fn catalog_ttl(&self) -> Duration {
        Duration::from_secs(self.catalog_ttl_secs)
    }

    /// Product limit as NonZeroUsize, clamping to 1 if zero.
    pub fn product_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.product_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Category limit as NonZeroUsize, clamping to 1 if zero.
    pub fn category_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.category_limit).unwrap_or(NonZeroUsize::MIN)
    }

    /// Related-strip limit as NonZeroUsize, clamping to 1 if zero.
    pub fn related_limit_non_zero(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.related_limit).unwrap_or(NonZeroUsize::MIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert!(config.single_flight);
        assert_eq!(config.category_list_ttl_secs, 86_400);
        assert_eq!(config.featured_ttl_secs, 3_600);
        assert_eq!(config.product_ttl_secs, 3_600);
        assert_eq!(config.catalog_ttl_secs, 3_600);
        assert_eq!(config.product_limit, 500);
    }

    #[test]
    fn category_list_holds_longer_than_everything_else() {
        let config = CacheConfig::default();
        assert!(config.category_list_ttl() > config.catalog_ttl());
        assert!(config.category_list_ttl() > config.product_ttl());
    }

    #[test]
    fn non_zero_clamps_to_min() {
        let config = CacheConfig {
            product_limit: 0,
            ..Default::default()
        };
        assert_eq!(config.product_limit_non_zero().get(), 1);
    }
}
