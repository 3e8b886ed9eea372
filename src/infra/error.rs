use thiserror::Error;
use tracing_subscriber::{filter::ParseError, util::TryInitError};

/// Failures while bringing up process-wide logging.
#[derive(Debug, Error)]
pub enum InfraError {
    #[error("invalid log filter in `{var}`: {source}")]
    LogFilter {
        var: &'static str,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber could not be installed: {0}")]
    Subscriber(#[from] TryInitError),
}

impl InfraError {
    pub fn log_filter(var: &'static str, source: ParseError) -> Self {
        Self::LogFilter { var, source }
    }
}
