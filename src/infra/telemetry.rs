use std::{env, sync::Once};

use metrics::{Unit, describe_counter, describe_gauge};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter,
    filter::LevelFilter,
    fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
/// `RUST_LOG`, when set, must parse; a typo there is reported instead of
/// silently dropping directives.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let raw = env::var(EnvFilter::DEFAULT_ENV).ok();
    let env_filter = env_filter(logging.level, raw.as_deref())?;

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()?;
    Ok(())
}

fn env_filter(level: LevelFilter, raw: Option<&str>) -> Result<EnvFilter, InfraError> {
    let builder = EnvFilter::builder().with_default_directive(level.into());
    match raw.map(str::trim).filter(|raw| !raw.is_empty()) {
        Some(raw) => builder
            .parse(raw)
            .map_err(|err| InfraError::log_filter(EnvFilter::DEFAULT_ENV, err)),
        None => Ok(builder.parse_lossy("")),
    }
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "imanage_query_cache_hit_total",
            Unit::Count,
            "Total number of query cache hits served without a load."
        );
        describe_counter!(
            "imanage_query_cache_miss_total",
            Unit::Count,
            "Total number of query cache misses that started a load."
        );
        describe_counter!(
            "imanage_query_cache_dedup_total",
            Unit::Count,
            "Total number of fetches attached to an in-flight load."
        );
        describe_counter!(
            "imanage_query_cache_evict_total",
            Unit::Count,
            "Total number of query cache evictions due to capacity."
        );
        describe_counter!(
            "imanage_query_cache_invalidated_total",
            Unit::Count,
            "Total number of entries marked stale by prefix invalidation."
        );
        describe_counter!(
            "imanage_query_cache_load_error_total",
            Unit::Count,
            "Total number of loads that failed and were not cached."
        );
        describe_gauge!(
            "imanage_query_cache_entries",
            Unit::Count,
            "Current number of entries held by the query cache."
        );
        describe_counter!(
            "imanage_session_expired_total",
            Unit::Count,
            "Total number of session-expired flows started after a 401."
        );
    });
}
