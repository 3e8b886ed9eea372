//! Session token and the seams through which the client reports to the operator.

use std::sync::{
    RwLock,
    atomic::{AtomicBool, Ordering},
};

use tracing::{error, info, warn};

use crate::cache::{rw_read, rw_write};

const SOURCE: &str = "api::session";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// A toast-style message for the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn warning(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Sink for operator notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => info!(title = %notice.title, "{}", notice.message),
            NoticeLevel::Warning => warn!(title = %notice.title, "{}", notice.message),
            NoticeLevel::Error => error!(title = %notice.title, "{}", notice.message),
        }
    }
}

/// Invoked once when the server rejects the session; typically navigates to login.
pub trait SessionExpiryHandler: Send + Sync {
    fn session_expired(&self);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingExpiryHandler;

impl SessionExpiryHandler for LoggingExpiryHandler {
    fn session_expired(&self) {
        warn!(
            redirect = "/login",
            "session expired; log in again to continue"
        );
    }
}

/// Token store with a single-flight guard for the session-expired flow.
#[derive(Debug, Default)]
pub struct Session {
    token: RwLock<Option<String>>,
    expiring: AtomicBool,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.set_token(token);
        session
    }

    pub fn token(&self) -> Option<String> {
        rw_read(&self.token, SOURCE, "token").clone()
    }

    pub fn is_authenticated(&self) -> bool {
        rw_read(&self.token, SOURCE, "is_authenticated").is_some()
    }

    /// Store a fresh token and re-arm the expiry guard.
    pub fn set_token(&self, token: impl Into<String>) {
        *rw_write(&self.token, SOURCE, "set_token") = Some(token.into());
        self.expiring.store(false, Ordering::Release);
    }

    pub fn clear(&self) {
        *rw_write(&self.token, SOURCE, "clear") = None;
    }

    /// True for exactly one caller until the next [`Session::set_token`].
    pub(crate) fn begin_expiry(&self) -> bool {
        self.expiring
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
