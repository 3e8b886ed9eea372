//! Search controller behavior against a backend whose responses are
//! released by the test, so resolution order is controlled.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use imanage::api::ApiError;
use imanage::cache::{CacheConfig, QueryCache};
use imanage::search::{
    Load, QueryFilter, SearchBackend, SearchController, SearchKind, SearchPhase,
};
use imanage_api_types::ResultRecord;
use tokio::sync::{Semaphore, mpsc};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Call {
    text: &'static str,
    count: bool,
}

/// Every call blocks until the test releases a permit for its search text.
struct GatedBackend {
    totals: HashMap<&'static str, usize>,
    gates: HashMap<&'static str, Semaphore>,
    calls: mpsc::UnboundedSender<Call>,
}

impl GatedBackend {
    fn new(totals: &[(&'static str, usize)]) -> (Arc<Self>, mpsc::UnboundedReceiver<Call>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let backend = Self {
            totals: totals.iter().copied().collect(),
            gates: totals
                .iter()
                .map(|(text, _)| (*text, Semaphore::new(0)))
                .collect(),
            calls: tx,
        };
        (Arc::new(backend), rx)
    }

    fn release(&self, text: &str, permits: usize) {
        self.gates[text].add_permits(permits);
    }
}

#[async_trait]
impl SearchBackend for GatedBackend {
    async fn fetch_records(&self, filter: &QueryFilter) -> Result<Vec<ResultRecord>, ApiError> {
        let encoded = filter.to_query_param()?;
        let (text, total) = self
            .totals
            .iter()
            .find(|(text, _)| encoded.contains(&format!("%{text}%")))
            .map(|(text, total)| (*text, *total))
            .ok_or_else(|| ApiError::validation("unexpected search"))?;

        let count = filter.limit.is_none();
        self.calls.send(Call { text, count }).expect("test alive");
        self.gates[text]
            .acquire()
            .await
            .expect("gate open")
            .forget();

        let rows = if count {
            total
        } else {
            total.min(filter.limit.unwrap_or(0) as usize)
        };
        Ok((0..rows)
            .map(|n| ResultRecord {
                id: format!("{text}-{n}"),
                owner_name: Some(text.to_string()),
                private_code: None,
                card_type: None,
                package_id: None,
            })
            .collect())
    }
}

fn controller(backend: Arc<GatedBackend>) -> SearchController {
    let cache = QueryCache::new(&CacheConfig::with_stale_after(Duration::from_secs(60)));
    SearchController::new(backend, cache, NonZeroU32::new(20).expect("non-zero"))
}

fn call(text: &'static str, count: bool) -> Option<Call> {
    Some(Call { text, count })
}

#[tokio::test]
async fn latest_search_wins_when_older_results_arrive_last() {
    let (backend, mut calls) = GatedBackend::new(&[("old", 99), ("new", 3)]);
    let search = controller(Arc::clone(&backend));

    let old = tokio::spawn({
        let search = search.clone();
        async move { search.set_filter(SearchKind::All, "old").await }
    });
    assert_eq!(calls.recv().await, call("old", true));

    let new = tokio::spawn({
        let search = search.clone();
        async move { search.set_filter(SearchKind::All, "new").await }
    });
    assert_eq!(calls.recv().await, call("new", true));
    backend.release("new", 2);
    assert_eq!(calls.recv().await, call("new", false));
    let settled = new.await.expect("new search");
    assert_eq!(settled.phase(), SearchPhase::Ready);

    backend.release("old", 1);
    let after_old = old.await.expect("old search");

    // The stale count was dropped: no page request for it, state untouched.
    assert!(calls.try_recv().is_err());
    assert_eq!(after_old.filter().text, "new");
    assert_eq!(after_old.count(), &Load::Loaded(3));
    let owners: Vec<String> = after_old
        .records()
        .value()
        .map(|rows| rows.iter().filter_map(|r| r.owner_name.clone()).collect())
        .unwrap_or_default();
    assert_eq!(owners, vec!["new"; 3]);
}

#[tokio::test]
async fn older_page_arriving_after_newer_search_settles_is_dropped() {
    let (backend, mut calls) = GatedBackend::new(&[("old", 40), ("new", 2)]);
    let search = controller(Arc::clone(&backend));

    let old = tokio::spawn({
        let search = search.clone();
        async move { search.set_filter(SearchKind::All, "old").await }
    });
    assert_eq!(calls.recv().await, call("old", true));
    backend.release("old", 1);
    assert_eq!(calls.recv().await, call("old", false));
    assert_eq!(search.state().phase(), SearchPhase::Fetching);

    let new = tokio::spawn({
        let search = search.clone();
        async move { search.set_filter(SearchKind::All, "new").await }
    });
    assert_eq!(calls.recv().await, call("new", true));
    backend.release("new", 2);
    assert_eq!(calls.recv().await, call("new", false));
    let settled = new.await.expect("new search");
    assert_eq!(settled.phase(), SearchPhase::Ready);

    backend.release("old", 1);
    let after_old = old.await.expect("old search");

    assert!(calls.try_recv().is_err());
    assert_eq!(after_old.phase(), SearchPhase::Ready);
    assert_eq!(after_old.filter().text, "new");
    assert_eq!(after_old.window().total_count, 2);
    let ids: Vec<String> = after_old
        .records()
        .value()
        .map(|rows| rows.iter().map(|r| r.id.clone()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec!["new-0", "new-1"]);
}

#[tokio::test]
async fn repeated_search_for_fresh_key_makes_no_requests() {
    let (backend, mut calls) = GatedBackend::new(&[("lan", 45)]);
    let search = controller(Arc::clone(&backend));
    backend.release("lan", 2);

    let state = search.set_filter(SearchKind::ShopOnly, "lan").await;
    assert_eq!(state.window().total_pages(), 3);
    assert_eq!(calls.recv().await, call("lan", true));
    assert_eq!(calls.recv().await, call("lan", false));

    let state = search.run_search().await;
    assert_eq!(state.phase(), SearchPhase::Ready);
    assert!(calls.try_recv().is_err());
}

#[tokio::test]
async fn concurrent_identical_searches_share_requests() {
    let (backend, mut calls) = GatedBackend::new(&[("lan", 5)]);
    let search = controller(Arc::clone(&backend));

    let first = tokio::spawn({
        let search = search.clone();
        async move { search.set_filter(SearchKind::All, "lan").await }
    });
    assert_eq!(calls.recv().await, call("lan", true));
    let second = tokio::spawn({
        let search = search.clone();
        async move { search.run_search().await }
    });

    backend.release("lan", 2);
    let first = first.await.expect("first");
    let second = second.await.expect("second");
    assert_eq!(first.count(), &Load::Loaded(5));
    assert_eq!(second.count(), &Load::Loaded(5));

    let mut seen = Vec::new();
    while let Ok(call) = calls.try_recv() {
        seen.push(call);
    }
    assert_eq!(seen, vec![Call { text: "lan", count: false }]);
}
