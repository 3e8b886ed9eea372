use std::collections::HashSet;

use imanage::api::ApiError;
use imanage::cache::{CacheConfig, QueryCache, QueryKey};
use metrics_util::debugging::DebuggingRecorder;

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let cache: QueryCache<ApiError> = QueryCache::new(&CacheConfig {
        max_entries: 1,
        ..CacheConfig::default()
    });
    let first = QueryKey::new("icom").with("c1");
    let second = QueryKey::new("icom").with("c2");

    // miss, then hit
    cache
        .fetch(&first, || async { Ok::<_, ApiError>(1_u32) })
        .await
        .expect("load");
    cache
        .fetch(&first, || async { Ok::<_, ApiError>(2_u32) })
        .await
        .expect("hit");

    // dedup: the second caller joins the first load
    let slow = || async {
        tokio::task::yield_now().await;
        Ok::<_, ApiError>(3_u32)
    };
    let (a, b) = tokio::join!(cache.fetch(&second, slow), cache.fetch(&second, slow));
    assert_eq!(a.map(|v| *v), b.map(|v| *v));

    // the second key evicted the first; a failing reload is not cached
    let failed = cache
        .fetch(&first, || async {
            Err::<u32, _>(ApiError::Transport {
                message: "offline".into(),
            })
        })
        .await;
    assert!(failed.is_err());
    cache.invalidate(&QueryKey::new("icom"));

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "imanage_query_cache_hit_total",
        "imanage_query_cache_miss_total",
        "imanage_query_cache_dedup_total",
        "imanage_query_cache_evict_total",
        "imanage_query_cache_load_error_total",
        "imanage_query_cache_invalidated_total",
        "imanage_query_cache_entries",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
