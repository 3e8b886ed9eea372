//! HTTP access to the console API and the QR search backend.
//!
//! [`ApiClient`] owns the transport concerns: base URLs, the session cookie,
//! status classification and the notices that accompany 401/403/5xx
//! responses. Each submodule adds the typed endpoints of one resource.

mod actions;
mod auth;
mod board;
mod client;
mod error;
mod icom;
mod ishop;
mod members;
mod qrids;
mod session;

pub use client::{ApiClient, ApiClientBuilder, Backend};
pub use error::ApiError;
pub use members::MemberQuery;
pub(crate) use members::DEFAULT_LEADERBOARD_LIMIT;
pub use session::{
    LoggingExpiryHandler, Notice, NoticeLevel, Notifier, Session, SessionExpiryHandler,
    TracingNotifier,
};
