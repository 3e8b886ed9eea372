//! Paginated QR record search.
//!
//! The flow is split in two:
//!
//! - [`state`] is a pure reducer: events in, new state plus effects out. It
//!   owns validation, page clamping and last-request-wins reconciliation.
//! - [`controller`] performs the effects (count and page fetches through the
//!   query cache) and feeds the results back as events.

pub mod controller;
pub mod filter;
pub mod pagination;
pub mod predicate;
pub mod query;
pub mod state;

pub use controller::{SearchBackend, SearchController};
pub use filter::{SearchFilter, SearchKind};
pub use pagination::{PageItem, PageWindow, page_window};
pub use predicate::{Predicate, Projection, QueryFilter};
pub use query::SearchQuery;
pub use state::{Load, SearchEffect, SearchEvent, SearchPhase, SearchState, Snapshot};
