#![deny(clippy::all, clippy::pedantic)]

use httpmock::prelude::*;
use imanage::config::{ConsoleOverrides, Settings};
use imanage::search::{QueryFilter, SearchFilter, SearchKind};
use tempfile::NamedTempFile;
use url::Url;

use crate::args::{
    AuthArgs, AuthCmd, CardsCmd, Cli, Commands, LeaderboardCmd, LeaderboardKindArg, LikeSourceArg,
    MembersCmd, Payload, SearchArgs, SearchKindArg,
};
use crate::client::{CliError, Ctx, build_ctx_from_cli};
use crate::handlers::{auth, cards, leaderboard, members, search};

fn settings(server: &MockServer) -> Settings {
    let mut settings = Settings::defaults().expect("defaults");
    settings.api.base_url = Url::parse(&server.url("/api/v1/")).expect("console url");
    settings.api.search_base_url = Url::parse(&server.url("/api/")).expect("search url");
    settings
}

fn ctx(server: &MockServer) -> Ctx {
    Ctx::new(settings(server), Some("t0k".into()), None).expect("ctx")
}

fn tmp_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("tmp file");
    std::io::Write::write_all(&mut file, contents.as_bytes()).expect("write tmp");
    file
}

fn logout_cli(token_file: Option<std::path::PathBuf>, token_env: Option<&str>) -> Cli {
    Cli {
        overrides: ConsoleOverrides::default(),
        token_file,
        token_env: token_env.map(str::to_string),
        command: Commands::Auth(AuthArgs {
            action: AuthCmd::Logout,
        }),
    }
}

#[test]
fn build_ctx_prefers_token_file() -> Result<(), CliError> {
    let file = tmp_file("file-token\n");
    let ctx = build_ctx_from_cli(&logout_cli(Some(file.path().to_path_buf()), Some("env-token")))?;
    assert_eq!(
        ctx.console.api().session().token().as_deref(),
        Some("file-token")
    );
    Ok(())
}

#[test]
fn build_ctx_falls_back_to_env_when_file_is_missing() -> Result<(), CliError> {
    let dir = tempfile::tempdir().expect("tmp dir");
    let missing = dir.path().join("token");
    let ctx = build_ctx_from_cli(&logout_cli(Some(missing), Some("env-token")))?;
    assert_eq!(
        ctx.console.api().session().token().as_deref(),
        Some("env-token")
    );
    Ok(())
}

#[test]
fn payload_prefers_file_over_inline() -> Result<(), CliError> {
    let file = tmp_file(r#"{"name": "from-file"}"#);
    let payload = Payload {
        data: Some(r#"{"name": "inline"}"#.into()),
        data_file: Some(file.path().to_path_buf()),
    };
    let value: serde_json::Value = payload.parse()?;
    assert_eq!(value["name"], "from-file");
    Ok(())
}

#[test]
fn payload_rejects_invalid_json() {
    let payload = Payload {
        data: Some("{not json".into()),
        data_file: None,
    };
    let err = payload
        .parse::<serde_json::Value>()
        .expect_err("invalid json");
    assert!(matches!(err, CliError::InvalidInput(_)));
}

#[tokio::test]
async fn login_writes_token_file() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/v1/auth/login")
            .json_body(serde_json::json!({"username": "lan", "password": "pw"}));
        then.status(200)
            .json_body(serde_json::json!({"token": "fresh", "user": {"id": 1}}));
    });

    let dir = tempfile::tempdir().expect("tmp dir");
    let token_path = dir.path().join("token");
    let ctx = Ctx::new(settings(&server), None, Some(token_path.clone()))?;
    auth::handle(
        &ctx,
        AuthCmd::Login {
            username: "lan".into(),
            password: "pw".into(),
        },
    )
    .await?;

    mock.assert();
    let stored = std::fs::read_to_string(&token_path).expect("token file");
    assert_eq!(stored.trim(), "fresh");

    auth::handle(&ctx, AuthCmd::Logout).await?;
    assert!(!token_path.exists());
    Ok(())
}

#[tokio::test]
async fn login_requires_token_file() {
    let server = MockServer::start();
    let ctx = ctx(&server);
    let err = auth::handle(
        &ctx,
        AuthCmd::Login {
            username: "lan".into(),
            password: "pw".into(),
        },
    )
    .await
    .expect_err("no token file");
    assert!(matches!(err, CliError::MissingTokenFile));
}

#[tokio::test]
async fn search_issues_count_then_page() -> Result<(), CliError> {
    let server = MockServer::start();
    let filter = SearchFilter::new(SearchKind::ShopOnly, "lan");
    let count_param = QueryFilter::count(&filter)
        .to_query_param()
        .expect("count filter");
    let page_param = QueryFilter::page(&filter, 1, 20)
        .to_query_param()
        .expect("page filter");

    let count = server.mock(|when, then| {
        when.method(GET)
            .path("/api/QRIDs")
            .query_param("filter", count_param.as_str());
        then.status(200).body(r#"[{"id": 1}, {"id": 2}]"#);
    });
    let page = server.mock(|when, then| {
        when.method(GET)
            .path("/api/QRIDs")
            .query_param("filter", page_param.as_str());
        then.status(200).body(
            r#"[{"id": 1, "ownerName": "Lan", "private": 77, "cardType": "CARD_TYPE.ISHOP"},
                {"id": 2, "ownerName": "Lanh", "private": "88"}]"#,
        );
    });

    let ctx = ctx(&server);
    search::handle(
        &ctx,
        SearchArgs {
            text: Some("lan".into()),
            kind: SearchKindArg::Ishop,
            page: 1,
            url: None,
            links: true,
        },
    )
    .await?;

    count.assert_hits(1);
    page.assert_hits(1);
    Ok(())
}

#[tokio::test]
async fn search_rejects_blank_text_without_requests() {
    let server = MockServer::start();
    let any = server.mock(|when, then| {
        when.method(GET).path("/api/QRIDs");
        then.status(200).body("[]");
    });

    let ctx = ctx(&server);
    let err = search::handle(
        &ctx,
        SearchArgs {
            text: None,
            kind: SearchKindArg::All,
            page: 1,
            url: Some("q=%20%20&type=icard".into()),
            links: false,
        },
    )
    .await
    .expect_err("blank");

    assert!(matches!(err, CliError::InvalidInput(_)));
    any.assert_hits(0);
}

#[tokio::test]
async fn members_search_uses_search_endpoint() -> Result<(), CliError> {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/icom/c1/search")
            .query_param("q", "tea")
            .query_param("page", "2")
            .query_param("limit", "10")
            .header("cookie", "token=t0k");
        then.status(200)
            .json_body(serde_json::json!({"members": [], "total": 0, "page": 2, "limit": 10}));
    });

    let ctx = ctx(&server);
    members::handle(
        &ctx,
        MembersCmd::List {
            icom: "c1".into(),
            page: 2,
            limit: 10,
            search: Some("tea".into()),
            industry: Some("food".into()),
            province: None,
            status: None,
            rank: None,
        },
    )
    .await?;
    mock.assert();
    Ok(())
}

#[tokio::test]
async fn leaderboard_sends_source_for_likes_only() -> Result<(), CliError> {
    let server = MockServer::start();
    let likes = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/icom/c1/leaderboard")
            .query_param("type", "likes")
            .query_param("limit", "5")
            .query_param("source", "ishop");
        then.status(200)
            .json_body(serde_json::json!({"type": "likes", "entries": []}));
    });
    let interactions = server.mock(|when, then| {
        when.method(GET)
            .path("/api/v1/icom/c1/leaderboard")
            .query_param("type", "interactions")
            .query_param_missing("source");
        then.status(200)
            .json_body(serde_json::json!({"type": "interactions", "entries": []}));
    });

    let ctx = ctx(&server);
    leaderboard::handle(
        &ctx,
        LeaderboardCmd::Show {
            icom: "c1".into(),
            kind: LeaderboardKindArg::Likes,
            limit: Some(5),
            source: Some(LikeSourceArg::Ishop),
        },
    )
    .await?;
    leaderboard::handle(
        &ctx,
        LeaderboardCmd::Show {
            icom: "c1".into(),
            kind: LeaderboardKindArg::Interactions,
            limit: None,
            source: Some(LikeSourceArg::Ishop),
        },
    )
    .await?;

    likes.assert();
    interactions.assert();
    Ok(())
}

#[tokio::test]
async fn cards_qr_writes_svg_for_both_links() -> Result<(), CliError> {
    let server = MockServer::start();
    let detail = server.mock(|when, then| {
        when.method(GET).path("/api/QRIDs/881200");
        then.status(200).body(
            r#"{"id": 881200, "ownerName": "Lan", "private": 4411, "cardType": "CARD_TYPE.ISHOP"}"#,
        );
    });
    let dir = tempfile::tempdir().expect("tmp dir");

    cards::handle(
        &ctx(&server),
        CardsCmd::Qr {
            id: "881200".into(),
            out: Some(dir.path().to_path_buf()),
        },
    )
    .await?;

    detail.assert_hits(1);
    for label in ["public", "private"] {
        let svg = std::fs::read_to_string(dir.path().join(format!("881200-{label}.svg")))
            .expect("svg written");
        assert!(svg.contains("<svg"), "{label} is not an svg");
    }
    Ok(())
}

#[tokio::test]
async fn cards_qr_needs_a_private_code() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/QRIDs/7");
        then.status(200).body(r#"{"id": 7}"#);
    });
    let dir = tempfile::tempdir().expect("tmp dir");

    let err = cards::handle(
        &ctx(&server),
        CardsCmd::Qr {
            id: "7".into(),
            out: Some(dir.path().to_path_buf()),
        },
    )
    .await
    .expect_err("no private code");
    assert!(matches!(err, CliError::Domain(_)));
    assert!(std::fs::read_dir(dir.path()).expect("dir").next().is_none());
}
