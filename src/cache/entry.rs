//! TTL-scoped memoization primitives.
//!
//! [`TtlCell`] memoizes one value per query shape; [`TtlMap`] memoizes one
//! value per key with LRU bounding. Both share the same `get_or_compute`
//! discipline:
//!
//! - a hit younger than the TTL returns the memoized `Arc` without invoking
//!   the compute function;
//! - a miss (absent or expired) runs the compute, replaces the slot
//!   wholesale, and returns the fresh value;
//! - a failed compute stores nothing and propagates the error — an expired
//!   value is never served as a fallback.
//!
//! Concurrent callers racing on the same expired slot share one in-flight
//! computation through a per-slot async mutex when single-flight is enabled;
//! with it disabled the race is benign duplicate work, since slots are
//! replaced wholesale and never merged.

use std::future::Future;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use dashmap::DashMap;
use lru::LruCache;
use metrics::counter;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::keys::CacheShape;
use super::lock::{rw_read, rw_write};

const SOURCE: &str = "cache::entry";

/// A memoized value plus the instant it was stored.
#[derive(Debug, Clone)]
struct TimedValue<T> {
    value: T,
    stored_at: Instant,
}

impl<T> TimedValue<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

fn record_hit(shape: CacheShape) {
    counter!("vetrina_cache_hit_total", "shape" => shape.metric_label()).increment(1);
}

fn record_miss(shape: CacheShape) {
    counter!("vetrina_cache_miss_total", "shape" => shape.metric_label()).increment(1);
    debug!(key = %shape.key(), "Cache miss; recomputing");
}

/// Singleton cache slot for one query shape.
pub struct TtlCell<T> {
    slot: RwLock<Option<TimedValue<Arc<T>>>>,
    flight: Mutex<()>,
    single_flight: bool,
}

impl<T> TtlCell<T> {
    pub fn new(single_flight: bool) -> Self {
        Self {
            slot: RwLock::new(None),
            flight: Mutex::new(()),
            single_flight,
        }
    }

    /// Return the memoized value when fresh, otherwise run `compute`, store
    /// its result, and return it.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        shape: CacheShape,
        ttl: Duration,
        compute: F,
    ) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.lookup(ttl) {
            record_hit(shape);
            return Ok(value);
        }

        let _guard = if self.single_flight {
            let guard = self.flight.lock().await;
            // The winner of the race may have repopulated the slot while we
            // waited for the guard.
            if let Some(value) = self.lookup(ttl) {
                record_hit(shape);
                return Ok(value);
            }
            Some(guard)
        } else {
            None
        };

        record_miss(shape);
        let value = Arc::new(compute().await?);
        *rw_write(&self.slot, SOURCE, "cell.store") = Some(TimedValue::new(value.clone()));
        Ok(value)
    }

    pub fn invalidate(&self) {
        *rw_write(&self.slot, SOURCE, "cell.invalidate") = None;
    }

    fn lookup(&self, ttl: Duration) -> Option<Arc<T>> {
        rw_read(&self.slot, SOURCE, "cell.lookup")
            .as_ref()
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.value.clone())
    }
}

/// Keyed cache section for one query shape, LRU-bounded.
pub struct TtlMap<K, V> {
    entries: RwLock<LruCache<K, TimedValue<Arc<V>>>>,
    flights: DashMap<K, Arc<Mutex<()>>>,
    single_flight: bool,
}

impl<K, V> TtlMap<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn new(capacity: NonZeroUsize, single_flight: bool) -> Self {
        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            flights: DashMap::new(),
            single_flight,
        }
    }

    /// Return the memoized value for `key` when fresh, otherwise run
    /// `compute`, store its result under `key`, and return it.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        shape: CacheShape,
        key: K,
        ttl: Duration,
        compute: F,
    ) -> Result<Arc<V>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.lookup(&key, ttl) {
            record_hit(shape);
            return Ok(value);
        }

        let _guard = if self.single_flight {
            let flight = self
                .flights
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone();
            let guard = flight.lock_owned().await;
            if let Some(value) = self.lookup(&key, ttl) {
                record_hit(shape);
                return Ok(value);
            }
            Some(guard)
        } else {
            None
        };

        record_miss(shape);
        let result = compute().await;
        // Retire the flight entry so the map does not accumulate dead
        // mutexes; waiters holding the Arc still serialize correctly.
        self.flights.remove(&key);
        let value = Arc::new(result?);
        rw_write(&self.entries, SOURCE, "map.store")
            .put(key, TimedValue::new(value.clone()));
        Ok(value)
    }

    pub fn invalidate_all(&self) {
        rw_write(&self.entries, SOURCE, "map.invalidate_all").clear();
    }

    pub fn len(&self) -> usize {
        rw_read(&self.entries, SOURCE, "map.len").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &K, ttl: Duration) -> Option<Arc<V>> {
        rw_write(&self.entries, SOURCE, "map.lookup")
            .get(key)
            .filter(|entry| entry.is_fresh(ttl))
            .map(|entry| entry.value.clone())
    }
}
