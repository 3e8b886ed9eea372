use std::path::PathBuf;

use clap::{Args, builder::BoolishValueParser};

/// Settings overrides accepted on the command line; they win over files and environment.
#[derive(Debug, Args, Default, Clone)]
pub struct ConsoleOverrides {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "IMANAGE_CONFIG_FILE",
        value_name = "PATH",
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Override the console API base URL.
    #[arg(long = "api-base-url", value_name = "URL", global = true)]
    pub api_base_url: Option<String>,

    /// Override the QR search backend base URL.
    #[arg(long = "search-base-url", value_name = "URL", global = true)]
    pub search_base_url: Option<String>,

    /// Override the HTTP request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override the number of search results per page.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u32>,

    /// Override how long cached reads stay fresh.
    #[arg(long = "cache-stale-after-ms", value_name = "MILLIS", global = true)]
    pub cache_stale_after_ms: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
