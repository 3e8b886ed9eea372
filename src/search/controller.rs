//! Async driver for the search state machine.

use std::{
    collections::VecDeque,
    num::NonZeroU32,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use imanage_api_types::ResultRecord;
use tracing::{debug, instrument};

use crate::api::{ApiClient, ApiError};
use crate::cache::{QueryCache, QueryKey, mutex_lock};

use super::filter::{SearchFilter, SearchKind};
use super::predicate::QueryFilter;
use super::query::SearchQuery;
use super::state::{SearchEffect, SearchEvent, SearchState, Snapshot};

const SOURCE: &str = "search::controller";

/// Cache family shared by every search request.
pub(crate) const RECORDS_RESOURCE: &str = "qrids";

/// Where search requests go.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn fetch_records(&self, filter: &QueryFilter) -> Result<Vec<ResultRecord>, ApiError>;
}

#[async_trait]
impl SearchBackend for ApiClient {
    async fn fetch_records(&self, filter: &QueryFilter) -> Result<Vec<ResultRecord>, ApiError> {
        self.search_records(filter).await
    }
}

/// Owns search state and runs the count and page requests it asks for.
///
/// Clones share state. Any number of operations may be in flight at once;
/// the reducer discards results that no longer match the current filter and
/// page.
#[derive(Clone)]
pub struct SearchController {
    backend: Arc<dyn SearchBackend>,
    cache: QueryCache<ApiError>,
    state: Arc<Mutex<SearchState>>,
    page_size: NonZeroU32,
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("page_size", &self.page_size)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

impl SearchController {
    pub fn new(
        backend: Arc<dyn SearchBackend>,
        cache: QueryCache<ApiError>,
        page_size: NonZeroU32,
    ) -> Self {
        Self {
            backend,
            cache,
            state: Arc::new(Mutex::new(SearchState::new(page_size))),
            page_size,
        }
    }

    /// Copy of the current state.
    pub fn state(&self) -> SearchState {
        mutex_lock(&self.state, SOURCE, "state").clone()
    }

    /// Store a new filter, go back to page 1 and search.
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn set_filter(&self, kind: SearchKind, text: &str) -> SearchState {
        self.drive(SearchEvent::FilterChanged(SearchFilter::new(kind, text)))
            .await
    }

    /// Move to `page` when it exists; anything else is ignored.
    #[instrument(skip(self))]
    pub async fn set_page(&self, page: u32) -> SearchState {
        self.drive(SearchEvent::PageRequested(page)).await
    }

    /// Adopt the state encoded in a console URL.
    pub async fn restore(&self, query: SearchQuery) -> SearchState {
        self.drive(SearchEvent::QueryRestored(query)).await
    }

    /// Search again with the current filter and page.
    pub async fn run_search(&self) -> SearchState {
        self.drive(SearchEvent::SearchStarted).await
    }

    async fn drive(&self, event: SearchEvent) -> SearchState {
        let mut queue: VecDeque<SearchEffect> = self.dispatch(event).into();
        while let Some(effect) = queue.pop_front() {
            let follow_up = match effect {
                SearchEffect::RunSearch => self.dispatch(SearchEvent::SearchStarted),
                SearchEffect::FetchCount(snapshot) => {
                    let result = self.count(&snapshot).await;
                    self.dispatch(SearchEvent::CountResolved { snapshot, result })
                }
                SearchEffect::FetchPage(snapshot) => {
                    let result = self.page(&snapshot).await;
                    self.dispatch(SearchEvent::PageResolved { snapshot, result })
                }
                SearchEffect::ScrollToTop => {
                    debug!(target = SOURCE, "scroll to top");
                    Vec::new()
                }
            };
            queue.extend(follow_up);
        }
        self.state()
    }

    fn dispatch(&self, event: SearchEvent) -> Vec<SearchEffect> {
        mutex_lock(&self.state, SOURCE, "dispatch").reduce(event)
    }

    async fn count(&self, snapshot: &Snapshot) -> Result<u64, ApiError> {
        let key = count_key(&snapshot.filter);
        let backend = Arc::clone(&self.backend);
        let filter = QueryFilter::count(&snapshot.filter);
        let total = self
            .cache
            .fetch(&key, move || async move {
                let rows = backend.fetch_records(&filter).await?;
                Ok(rows.len() as u64)
            })
            .await?;
        Ok(*total)
    }

    async fn page(&self, snapshot: &Snapshot) -> Result<Arc<Vec<ResultRecord>>, ApiError> {
        let key = page_key(&snapshot.filter, snapshot.page, self.page_size.get());
        let backend = Arc::clone(&self.backend);
        let filter = QueryFilter::page(&snapshot.filter, snapshot.page, self.page_size.get());
        self.cache
            .fetch(&key, move || async move { backend.fetch_records(&filter).await })
            .await
    }
}

pub(crate) fn count_key(filter: &SearchFilter) -> QueryKey {
    QueryKey::new(RECORDS_RESOURCE)
        .with("count")
        .with(filter.kind)
        .with(filter.text.trim())
}

pub(crate) fn page_key(filter: &SearchFilter, page: u32, page_size: u32) -> QueryKey {
    QueryKey::new(RECORDS_RESOURCE)
        .with("page")
        .with(filter.kind)
        .with(filter.text.trim())
        .with(page)
        .with(page_size)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::cache::CacheConfig;
    use crate::search::state::{BLANK_QUERY_MESSAGE, SearchPhase};

    use super::*;

    /// Answers every count with `total` rows and every page with up to
    /// `limit` rows, counting calls per kind.
    struct FixedBackend {
        total: usize,
        counts: AtomicUsize,
        pages: AtomicUsize,
    }

    impl FixedBackend {
        fn new(total: usize) -> Arc<Self> {
            Arc::new(Self {
                total,
                counts: AtomicUsize::new(0),
                pages: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchBackend for FixedBackend {
        async fn fetch_records(&self, filter: &QueryFilter) -> Result<Vec<ResultRecord>, ApiError> {
            let (skip, take) = match filter.limit {
                Some(limit) => {
                    self.pages.fetch_add(1, Ordering::SeqCst);
                    (filter.skip.unwrap_or(0) as usize, limit as usize)
                }
                None => {
                    self.counts.fetch_add(1, Ordering::SeqCst);
                    (0, self.total)
                }
            };
            Ok((skip..self.total.min(skip + take))
                .map(|n| ResultRecord {
                    id: n.to_string(),
                    owner_name: None,
                    private_code: None,
                    card_type: None,
                    package_id: None,
                })
                .collect())
        }
    }

    fn controller(backend: Arc<FixedBackend>) -> SearchController {
        let cache = QueryCache::new(&CacheConfig::with_stale_after(Duration::from_secs(60)));
        SearchController::new(backend, cache, NonZeroU32::new(20).expect("non-zero"))
    }

    #[tokio::test]
    async fn search_issues_one_count_and_one_page() {
        let backend = FixedBackend::new(45);
        let controller = controller(backend.clone());

        let state = controller.set_filter(SearchKind::All, "lan").await;
        assert_eq!(state.phase(), SearchPhase::Ready);
        assert_eq!(state.window().total_pages(), 3);
        assert_eq!(state.records().value().map(|rows| rows.len()), Some(20));
        assert_eq!(backend.counts.load(Ordering::SeqCst), 1);
        assert_eq!(backend.pages.load(Ordering::SeqCst), 1);

        controller.run_search().await;
        assert_eq!(backend.counts.load(Ordering::SeqCst), 1);
        assert_eq!(backend.pages.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn paging_reuses_the_cached_count() {
        let backend = FixedBackend::new(45);
        let controller = controller(backend.clone());
        controller.set_filter(SearchKind::All, "lan").await;

        let state = controller.set_page(3).await;
        assert_eq!(state.window().current_page, 3);
        assert_eq!(state.records().value().map(|rows| rows.len()), Some(5));
        assert_eq!(backend.counts.load(Ordering::SeqCst), 1);
        assert_eq!(backend.pages.load(Ordering::SeqCst), 2);

        let state = controller.set_page(9).await;
        assert_eq!(state.window().current_page, 3);
        assert_eq!(backend.pages.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn blank_filter_makes_no_requests() {
        let backend = FixedBackend::new(5);
        let controller = controller(backend.clone());

        let state = controller.set_filter(SearchKind::ShopOnly, "  ").await;
        assert_eq!(state.validation_message(), Some(BLANK_QUERY_MESSAGE));
        let state = controller.run_search().await;
        assert_eq!(state.phase(), SearchPhase::Error);
        assert_eq!(backend.counts.load(Ordering::SeqCst), 0);
        assert_eq!(backend.pages.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn restore_clamps_page_to_result_count() {
        let backend = FixedBackend::new(25);
        let controller = controller(backend);

        let state = controller
            .restore(SearchQuery::from_query_string("q=lan&type=icard&page=8"))
            .await;
        assert_eq!(state.window().current_page, 2);
        assert_eq!(state.records().value().map(|rows| rows.len()), Some(5));
    }

    #[test]
    fn keys_share_the_records_family() {
        let filter = SearchFilter::new(SearchKind::ShopOnly, " lan ");
        let family = QueryKey::new(RECORDS_RESOURCE);
        assert!(count_key(&filter).starts_with(&family));
        assert_eq!(page_key(&filter, 2, 20).to_string(), "qrids/page/ishop/lan/2/20");
    }
}
