//! Vetrina — the read-path caching core of a small storefront catalog.
//!
//! The crate sits between a billed-per-read catalog store and the pages that
//! browse it. Every distinct query shape (category list, featured products,
//! single product, full catalog, …) is memoized once and reused across
//! requests until its TTL lapses or an admin mutation sweeps the cache.
//!
//! Module map:
//!
//! - [`config`] — typed settings with layered precedence (file → environment)
//! - [`domain`] — catalog records, slug derivation, pricing display math
//! - [`cache`] — TTL-scoped memoization and the coarse invalidation broadcaster
//! - [`application`] — store seams, the cached catalog reader, listing
//!   composition, cursor pagination, and the admin mutation services
//! - [`infra`] — the bundled in-memory store adapter, filesystem asset
//!   storage, the admin gate, and telemetry bootstrap

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
