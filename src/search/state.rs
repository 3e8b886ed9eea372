//! Search state machine.
//!
//! `Idle → Validating → Counting → Fetching → Ready | NoResults | Error`.
//!
//! [`SearchState::reduce`] is the only place state changes. It never performs
//! I/O; instead it returns [`SearchEffect`]s for the driver to carry out and
//! report back as events. Every fetch effect carries the [`Snapshot`] it was
//! issued for and a result is applied only while that snapshot is still the
//! pending one, so the most recent request always wins.

use std::{num::NonZeroU32, sync::Arc};

use imanage_api_types::ResultRecord;

use crate::api::ApiError;

use super::filter::SearchFilter;
use super::pagination::{PageItem, PageWindow};
use super::query::SearchQuery;

pub const BLANK_QUERY_MESSAGE: &str = "Please enter a search keyword";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPhase {
    Idle,
    Validating,
    Counting,
    Fetching,
    Ready,
    NoResults,
    Error,
}

/// Outcome of one of the two calls a search makes.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Load<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Failed(ApiError),
}

impl<T> Load<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Load::Loaded(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Load::Failed(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Load::Loading)
    }
}

/// The `(filter, page)` pair a request was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub filter: SearchFilter,
    pub page: u32,
}

#[derive(Debug, Clone)]
pub enum SearchEvent {
    FilterChanged(SearchFilter),
    QueryRestored(SearchQuery),
    PageRequested(u32),
    SearchStarted,
    CountResolved {
        snapshot: Snapshot,
        result: Result<u64, ApiError>,
    },
    PageResolved {
        snapshot: Snapshot,
        result: Result<Arc<Vec<ResultRecord>>, ApiError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEffect {
    /// Feed [`SearchEvent::SearchStarted`] back in.
    RunSearch,
    FetchCount(Snapshot),
    FetchPage(Snapshot),
    ScrollToTop,
}

#[derive(Debug, Clone)]
pub struct SearchState {
    filter: SearchFilter,
    window: PageWindow,
    phase: SearchPhase,
    count: Load<u64>,
    records: Load<Arc<Vec<ResultRecord>>>,
    validation: Option<String>,
    pending: Option<Snapshot>,
}

impl SearchState {
    pub fn new(page_size: NonZeroU32) -> Self {
        Self {
            filter: SearchFilter::default(),
            window: PageWindow::new(page_size),
            phase: SearchPhase::Idle,
            count: Load::Idle,
            records: Load::Idle,
            validation: None,
            pending: None,
        }
    }

    pub fn filter(&self) -> &SearchFilter {
        &self.filter
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn phase(&self) -> SearchPhase {
        self.phase
    }

    pub fn count(&self) -> &Load<u64> {
        &self.count
    }

    pub fn records(&self) -> &Load<Arc<Vec<ResultRecord>>> {
        &self.records
    }

    pub fn validation_message(&self) -> Option<&str> {
        self.validation.as_deref()
    }

    pub fn page_items(&self) -> Vec<PageItem> {
        self.window.items()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            filter: self.filter.clone(),
            page: self.window.current_page,
        }
    }

    /// URL form of the current filter and page.
    pub fn query(&self) -> SearchQuery {
        SearchQuery::new(self.filter.clone(), self.window.current_page)
    }

    pub fn reduce(&mut self, event: SearchEvent) -> Vec<SearchEffect> {
        match event {
            SearchEvent::FilterChanged(filter) => self.change_filter(filter),
            SearchEvent::QueryRestored(query) => self.restore(query),
            SearchEvent::PageRequested(page) => self.request_page(page),
            SearchEvent::SearchStarted => self.start(),
            SearchEvent::CountResolved { snapshot, result } => self.resolve_count(snapshot, result),
            SearchEvent::PageResolved { snapshot, result } => self.resolve_page(snapshot, result),
        }
    }

    fn change_filter(&mut self, filter: SearchFilter) -> Vec<SearchEffect> {
        let unchanged = filter == self.filter && self.window.current_page == 1;
        if unchanged && !matches!(self.phase, SearchPhase::Idle | SearchPhase::Error) {
            return Vec::new();
        }

        self.filter = filter;
        self.reset_results();
        if self.filter.is_blank() {
            self.reject_blank();
            return Vec::new();
        }
        self.phase = SearchPhase::Validating;
        vec![SearchEffect::RunSearch]
    }

    fn restore(&mut self, query: SearchQuery) -> Vec<SearchEffect> {
        self.filter = query.filter;
        self.reset_results();
        self.window.current_page = query.page.max(1);
        if self.filter.is_blank() {
            // Opening the page without a query is not an error.
            self.phase = SearchPhase::Idle;
            return Vec::new();
        }
        self.phase = SearchPhase::Validating;
        vec![SearchEffect::RunSearch]
    }

    fn request_page(&mut self, page: u32) -> Vec<SearchEffect> {
        if !self.window.accepts(page) || page == self.window.current_page {
            return Vec::new();
        }
        self.window.current_page = page;
        self.phase = SearchPhase::Validating;
        vec![SearchEffect::ScrollToTop, SearchEffect::RunSearch]
    }

    fn start(&mut self) -> Vec<SearchEffect> {
        if self.filter.is_blank() {
            self.reject_blank();
            return Vec::new();
        }

        let snapshot = self.snapshot();
        self.validation = None;
        self.pending = Some(snapshot.clone());
        self.phase = SearchPhase::Counting;
        self.count = Load::Loading;
        self.records = Load::Loading;
        vec![SearchEffect::FetchCount(snapshot)]
    }

    fn resolve_count(&mut self, snapshot: Snapshot, result: Result<u64, ApiError>) -> Vec<SearchEffect> {
        if !self.is_pending(&snapshot, SearchPhase::Counting) {
            return Vec::new();
        }

        match result {
            Ok(total) => {
                self.window.total_count = total;
                self.count = Load::Loaded(total);
            }
            // The last known total stays; after a reset that is zero.
            Err(err) => self.count = Load::Failed(err),
        }
        self.window.clamp();

        let next = self.snapshot();
        self.pending = Some(next.clone());
        self.phase = SearchPhase::Fetching;
        vec![SearchEffect::FetchPage(next)]
    }

    fn resolve_page(
        &mut self,
        snapshot: Snapshot,
        result: Result<Arc<Vec<ResultRecord>>, ApiError>,
    ) -> Vec<SearchEffect> {
        if !self.is_pending(&snapshot, SearchPhase::Fetching) {
            return Vec::new();
        }

        self.pending = None;
        match result {
            Ok(records) => {
                self.phase = if self.count == Load::Loaded(0) {
                    SearchPhase::NoResults
                } else {
                    SearchPhase::Ready
                };
                self.records = Load::Loaded(records);
            }
            Err(err) => {
                self.phase = SearchPhase::Error;
                self.records = Load::Failed(err);
            }
        }
        Vec::new()
    }

    fn is_pending(&self, snapshot: &Snapshot, phase: SearchPhase) -> bool {
        self.phase == phase && self.pending.as_ref() == Some(snapshot)
    }

    fn reset_results(&mut self) {
        self.window.current_page = 1;
        self.window.total_count = 0;
        self.count = Load::Idle;
        self.records = Load::Idle;
        self.pending = None;
    }

    fn reject_blank(&mut self) {
        self.phase = SearchPhase::Error;
        self.validation = Some(BLANK_QUERY_MESSAGE.to_string());
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::super::filter::SearchKind;
    use super::*;

    fn state() -> SearchState {
        SearchState::new(NonZeroU32::new(20).expect("non-zero"))
    }

    fn records(ids: &[&str]) -> Arc<Vec<ResultRecord>> {
        Arc::new(
            ids.iter()
                .map(|id| ResultRecord {
                    id: (*id).to_string(),
                    owner_name: None,
                    private_code: None,
                    card_type: None,
                    package_id: None,
                })
                .collect(),
        )
    }

    fn started(state: &mut SearchState, text: &str) -> Snapshot {
        let effects = state.reduce(SearchEvent::FilterChanged(SearchFilter::new(
            SearchKind::All,
            text,
        )));
        assert_eq!(effects, vec![SearchEffect::RunSearch]);
        match state.reduce(SearchEvent::SearchStarted).as_slice() {
            [SearchEffect::FetchCount(snapshot)] => snapshot.clone(),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn blank_text_is_rejected_without_effects() {
        let mut state = state();
        let effects = state.reduce(SearchEvent::FilterChanged(SearchFilter::new(
            SearchKind::ShopOnly,
            "   ",
        )));
        assert!(effects.is_empty());
        assert_eq!(state.phase(), SearchPhase::Error);
        assert_eq!(state.validation_message(), Some(BLANK_QUERY_MESSAGE));
        assert!(state.reduce(SearchEvent::SearchStarted).is_empty());
    }

    #[test]
    fn count_then_page_reaches_ready() {
        let mut state = state();
        let snapshot = started(&mut state, "lan");
        assert_eq!(state.phase(), SearchPhase::Counting);

        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot: snapshot.clone(),
            result: Ok(45),
        });
        assert_eq!(effects, vec![SearchEffect::FetchPage(snapshot.clone())]);
        assert_eq!(state.window().total_pages(), 3);

        state.reduce(SearchEvent::PageResolved {
            snapshot,
            result: Ok(records(&["1", "2"])),
        });
        assert_eq!(state.phase(), SearchPhase::Ready);
        assert_eq!(state.records().value().map(|rows| rows.len()), Some(2));
        assert_eq!(state.page_items(), vec![PageItem::Page(1), PageItem::Page(2), PageItem::Page(3)]);
    }

    #[test]
    fn zero_count_settles_as_no_results() {
        let mut state = state();
        let snapshot = started(&mut state, "nobody");
        state.reduce(SearchEvent::CountResolved {
            snapshot: snapshot.clone(),
            result: Ok(0),
        });
        state.reduce(SearchEvent::PageResolved {
            snapshot,
            result: Ok(records(&[])),
        });
        assert_eq!(state.phase(), SearchPhase::NoResults);
    }

    #[test]
    fn superseded_results_are_dropped() {
        let mut state = state();
        let first = started(&mut state, "old");
        let second = started(&mut state, "new");

        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot: first,
            result: Ok(999),
        });
        assert!(effects.is_empty());
        assert_eq!(state.count(), &Load::Loading);

        state.reduce(SearchEvent::CountResolved {
            snapshot: second.clone(),
            result: Ok(3),
        });
        assert_eq!(state.count(), &Load::Loaded(3));
        assert_eq!(state.filter().text, "new");
        assert_eq!(second.filter.text, "new");
    }

    #[test]
    fn failed_count_still_fetches_the_page() {
        let mut state = state();
        let snapshot = started(&mut state, "lan");
        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot: snapshot.clone(),
            result: Err(ApiError::Transport {
                message: "timed out".into(),
            }),
        });
        assert_eq!(effects, vec![SearchEffect::FetchPage(snapshot.clone())]);

        state.reduce(SearchEvent::PageResolved {
            snapshot,
            result: Ok(records(&["9"])),
        });
        assert_eq!(state.phase(), SearchPhase::Ready);
        assert!(state.count().error().is_some());
    }

    #[test]
    fn failed_count_after_restore_falls_back_to_first_page() {
        let mut state = state();
        state.reduce(SearchEvent::QueryRestored(SearchQuery::new(
            SearchFilter::new(SearchKind::All, "lan"),
            8,
        )));
        let snapshot = match state.reduce(SearchEvent::SearchStarted).as_slice() {
            [SearchEffect::FetchCount(snapshot)] => snapshot.clone(),
            other => panic!("unexpected effects: {other:?}"),
        };

        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot,
            result: Err(ApiError::Transport {
                message: "connection reset".into(),
            }),
        });
        match effects.as_slice() {
            [SearchEffect::FetchPage(next)] => assert_eq!(next.page, 1),
            other => panic!("unexpected effects: {other:?}"),
        }
        let window = state.window();
        assert!(window.current_page >= 1);
        assert!(window.current_page <= window.total_pages().max(1));
    }

    #[test]
    fn failed_count_on_page_change_keeps_known_total() {
        let mut state = state();
        let snapshot = started(&mut state, "lan");
        state.reduce(SearchEvent::CountResolved {
            snapshot: snapshot.clone(),
            result: Ok(60),
        });
        state.reduce(SearchEvent::PageResolved {
            snapshot,
            result: Ok(records(&["1"])),
        });

        state.reduce(SearchEvent::PageRequested(3));
        let snapshot = match state.reduce(SearchEvent::SearchStarted).as_slice() {
            [SearchEffect::FetchCount(snapshot)] => snapshot.clone(),
            other => panic!("unexpected effects: {other:?}"),
        };
        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot,
            result: Err(ApiError::Transport {
                message: "timed out".into(),
            }),
        });
        match effects.as_slice() {
            [SearchEffect::FetchPage(next)] => assert_eq!(next.page, 3),
            other => panic!("unexpected effects: {other:?}"),
        }
        assert_eq!(state.window().total_pages(), 3);
        assert_eq!(
            state.reduce(SearchEvent::PageRequested(2)),
            vec![SearchEffect::ScrollToTop, SearchEffect::RunSearch]
        );
    }

    #[test]
    fn page_from_superseded_search_is_dropped_while_newer_one_fetches() {
        let mut state = state();
        let old = started(&mut state, "old");
        state.reduce(SearchEvent::CountResolved {
            snapshot: old.clone(),
            result: Ok(40),
        });
        assert_eq!(state.phase(), SearchPhase::Fetching);

        let new = started(&mut state, "new");
        state.reduce(SearchEvent::CountResolved {
            snapshot: new.clone(),
            result: Ok(2),
        });
        assert_eq!(state.phase(), SearchPhase::Fetching);

        let effects = state.reduce(SearchEvent::PageResolved {
            snapshot: old.clone(),
            result: Ok(records(&["old-1", "old-2"])),
        });
        assert!(effects.is_empty());
        assert_eq!(state.phase(), SearchPhase::Fetching);
        assert!(state.records().is_loading());

        state.reduce(SearchEvent::PageResolved {
            snapshot: new,
            result: Ok(records(&["new-1", "new-2"])),
        });
        state.reduce(SearchEvent::PageResolved {
            snapshot: old,
            result: Err(ApiError::Transport {
                message: "late failure".into(),
            }),
        });
        assert_eq!(state.phase(), SearchPhase::Ready);
        let ids: Vec<&str> = state
            .records()
            .value()
            .map(|rows| rows.iter().map(|r| r.id.as_str()).collect())
            .unwrap_or_default();
        assert_eq!(ids, vec!["new-1", "new-2"]);
        assert_eq!(state.window().total_count, 2);
    }

    #[test]
    fn shrinking_count_clamps_before_page_fetch() {
        let mut state = state();
        state.reduce(SearchEvent::QueryRestored(SearchQuery::new(
            SearchFilter::new(SearchKind::All, "lan"),
            7,
        )));
        let snapshot = match state.reduce(SearchEvent::SearchStarted).as_slice() {
            [SearchEffect::FetchCount(snapshot)] => snapshot.clone(),
            other => panic!("unexpected effects: {other:?}"),
        };
        assert_eq!(snapshot.page, 7);

        let effects = state.reduce(SearchEvent::CountResolved {
            snapshot,
            result: Ok(30),
        });
        match effects.as_slice() {
            [SearchEffect::FetchPage(next)] => assert_eq!(next.page, 2),
            other => panic!("unexpected effects: {other:?}"),
        }
    }

    #[test]
    fn page_requests_outside_range_are_ignored() {
        let mut state = state();
        let snapshot = started(&mut state, "lan");
        state.reduce(SearchEvent::CountResolved {
            snapshot: snapshot.clone(),
            result: Ok(50),
        });
        state.reduce(SearchEvent::PageResolved {
            snapshot,
            result: Ok(records(&["1"])),
        });

        assert!(state.reduce(SearchEvent::PageRequested(0)).is_empty());
        assert!(state.reduce(SearchEvent::PageRequested(4)).is_empty());
        assert!(state.reduce(SearchEvent::PageRequested(1)).is_empty());
        assert_eq!(
            state.reduce(SearchEvent::PageRequested(3)),
            vec![SearchEffect::ScrollToTop, SearchEffect::RunSearch]
        );
        assert_eq!(state.window().current_page, 3);
    }

    #[test]
    fn changing_filter_resets_to_first_page() {
        let mut state = state();
        state.reduce(SearchEvent::QueryRestored(SearchQuery::new(
            SearchFilter::new(SearchKind::All, "lan"),
            4,
        )));
        state.reduce(SearchEvent::FilterChanged(SearchFilter::new(
            SearchKind::ShopOnly,
            "lan",
        )));
        assert_eq!(state.window().current_page, 1);
        assert_eq!(state.query().to_query_string(), "q=lan&type=ishop&page=1");
    }

    #[test]
    fn restoring_without_text_stays_idle() {
        let mut state = state();
        let effects = state.reduce(SearchEvent::QueryRestored(SearchQuery::default()));
        assert!(effects.is_empty());
        assert_eq!(state.phase(), SearchPhase::Idle);
        assert!(state.validation_message().is_none());
    }
}
