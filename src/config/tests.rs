use std::io::Write;

use clap::Parser;

use super::*;

#[test]
fn defaults_match_console_conventions() {
    let settings = Settings::defaults().expect("valid settings");

    assert_eq!(
        settings.api.base_url.as_str(),
        "http://localhost:8080/api/v1/"
    );
    assert_eq!(
        settings.api.search_base_url.as_str(),
        "https://api.qrcare.net/api/"
    );
    assert_eq!(settings.api.timeout, Duration::from_secs(30));
    assert_eq!(settings.search.page_size.get(), 20);
    assert_eq!(settings.cache.stale_after_ms, DEFAULT_STALE_AFTER_MS);
    assert_eq!(settings.cache.max_entries, DEFAULT_MAX_ENTRIES);
    assert_eq!(settings.links.card_base_url, DEFAULT_CARD_BASE_URL);
    assert_eq!(settings.logging.level, LevelFilter::INFO);
    assert!(matches!(settings.logging.format, LogFormat::Compact));
}

#[test]
fn cli_overrides_take_highest_precedence() {
    let mut raw = RawSettings::default();
    raw.api.base_url = Some("http://file.example/api".to_string());
    raw.logging.level = Some("info".to_string());

    let overrides = ConsoleOverrides {
        api_base_url: Some("http://cli.example/v2".to_string()),
        log_level: Some("debug".to_string()),
        page_size: Some(50),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert_eq!(settings.api.base_url.as_str(), "http://cli.example/v2/");
    assert_eq!(settings.logging.level, LevelFilter::DEBUG);
    assert_eq!(settings.search.page_size.get(), 50);
}

#[test]
fn cli_json_logging_enforces_format() {
    let mut raw = RawSettings::default();
    let overrides = ConsoleOverrides {
        log_json: Some(true),
        ..Default::default()
    };

    raw.apply_overrides(&overrides);
    let settings = Settings::from_raw(raw).expect("valid settings");

    assert!(matches!(settings.logging.format, LogFormat::Json));
}

#[test]
fn base_urls_gain_trailing_slash_for_joining() {
    let url = parse_base_url("https://api.example.com/api", "api.base_url").expect("url");
    assert_eq!(url.join("QRIDs").expect("join").as_str(), "https://api.example.com/api/QRIDs");

    let url = parse_base_url("https://api.example.com/api/", "api.base_url").expect("url");
    assert_eq!(url.as_str(), "https://api.example.com/api/");
}

#[test]
fn rejects_non_http_base_url() {
    let mut raw = RawSettings::default();
    raw.api.search_base_url = Some("ftp://files.example".to_string());

    let err = Settings::from_raw(raw).expect_err("ftp must be rejected");
    assert!(matches!(
        err,
        LoadError::Invalid {
            key: "api.search_base_url",
            ..
        }
    ));
}

#[test]
fn rejects_zero_page_size_and_timeout() {
    let mut raw = RawSettings::default();
    raw.search.page_size = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "search.page_size",
            ..
        })
    ));

    let mut raw = RawSettings::default();
    raw.api.timeout_seconds = Some(0);
    assert!(matches!(
        Settings::from_raw(raw),
        Err(LoadError::Invalid {
            key: "api.timeout_seconds",
            ..
        })
    ));
}

#[test]
fn cache_capacity_is_clamped_and_zero_staleness_allowed() {
    let mut raw = RawSettings::default();
    raw.cache.max_entries = Some(0);
    raw.cache.stale_after_ms = Some(0);

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.cache.max_entries, 1);
    assert_eq!(settings.cache.stale_after_ms, 0);
}

#[test]
fn invalid_log_level_is_reported() {
    let mut raw = RawSettings::default();
    raw.logging.level = Some("loud".to_string());

    let err = Settings::from_raw(raw).expect_err("invalid level");
    assert!(err.to_string().contains("logging.level"));
}

#[test]
fn card_base_url_trailing_slash_is_trimmed() {
    let mut raw = RawSettings::default();
    raw.links.card_base_url = Some("https://cards.example/#!/".to_string());

    let settings = Settings::from_raw(raw).expect("valid settings");
    assert_eq!(settings.links.card_base_url, "https://cards.example/#!");
}

#[test]
fn explicit_config_file_is_loaded() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("temp file");
    writeln!(
        file,
        "[api]\nsearch_base_url = \"http://search.internal/api\"\n\n[search]\npage_size = 10"
    )
    .expect("write config");

    let overrides = ConsoleOverrides {
        config_file: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    let settings = load(&overrides).expect("settings");

    assert_eq!(
        settings.api.search_base_url.as_str(),
        "http://search.internal/api/"
    );
    assert_eq!(settings.search.page_size.get(), 10);
}

#[test]
fn overrides_parse_from_command_line() {
    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        overrides: ConsoleOverrides,
    }

    let harness = Harness::parse_from([
        "imanage",
        "--api-base-url",
        "http://console.local/api/v1",
        "--log-json",
        "true",
        "--timeout-seconds",
        "5",
    ]);

    assert_eq!(
        harness.overrides.api_base_url.as_deref(),
        Some("http://console.local/api/v1")
    );
    assert_eq!(harness.overrides.log_json, Some(true));
    assert_eq!(harness.overrides.timeout_seconds, Some(5));
}
