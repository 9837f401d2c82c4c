//! The cache paths emit their hit/miss/invalidation counters.

use std::collections::HashSet;
use std::sync::Arc;

use metrics_util::debugging::DebuggingRecorder;
use uuid::Uuid;

use vetrina::cache::{CacheConfig, CatalogCache, InvalidationBroadcaster};
use vetrina::domain::entities::ProductRecord;

#[tokio::test(start_paused = true)]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let cache = Arc::new(CatalogCache::new(CacheConfig::default()));
    let broadcaster = InvalidationBroadcaster::new(cache.clone());

    let empty = || async { Ok::<Vec<ProductRecord>, std::convert::Infallible>(Vec::new()) };
    cache.full_catalog(empty).await.expect("cold read");
    cache.full_catalog(empty).await.expect("warm read");
    broadcaster.product_upserted(Uuid::new_v4());

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "vetrina_cache_hit_total",
        "vetrina_cache_miss_total",
        "vetrina_cache_invalidate_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
