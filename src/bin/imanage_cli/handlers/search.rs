#![deny(clippy::all, clippy::pedantic)]

use imanage::domain::cards::{CardLinks, CardType};
use imanage::search::{SearchFilter, SearchPhase, SearchQuery, SearchState};
use imanage_api_types::ResultRecord;
use serde::Serialize;

use crate::args::SearchArgs;
use crate::client::{CliError, Ctx};
use crate::print::print_json;

#[derive(Debug, Serialize)]
struct SearchOutput<'a> {
    query: String,
    total_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    count_error: Option<String>,
    page: u32,
    total_pages: u32,
    pages: Vec<String>,
    results: Vec<Row<'a>>,
}

#[derive(Debug, Serialize)]
struct Row<'a> {
    #[serde(flatten)]
    record: &'a ResultRecord,
    label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    links: Option<CardLinks>,
}

pub async fn handle(ctx: &Ctx, args: SearchArgs) -> Result<(), CliError> {
    let query = match args.url.as_deref() {
        Some(url) => SearchQuery::from_query_string(url),
        None => SearchQuery::new(
            SearchFilter::new(args.kind.into(), args.text.unwrap_or_default()),
            args.page,
        ),
    };

    let search = &ctx.console.search;
    let mut state = search.restore(query).await;
    if state.phase() == SearchPhase::Idle {
        state = search.run_search().await;
    }

    if let Some(message) = state.validation_message() {
        return Err(CliError::InvalidInput(message.to_string()));
    }
    if let Some(err) = state.records().error() {
        return Err(CliError::Api(err.clone()));
    }

    let base_url = &ctx.settings.links.card_base_url;
    let records = state.records().value().cloned().unwrap_or_default();
    let rows = records
        .iter()
        .map(|record| Row {
            record,
            label: CardType::from_wire(record.card_type.as_deref()).label(),
            links: args
                .links
                .then(|| CardLinks::for_record(base_url, record).ok())
                .flatten(),
        })
        .collect();

    print_json(&output(&state, rows))
}

fn output<'a>(state: &SearchState, results: Vec<Row<'a>>) -> SearchOutput<'a> {
    let window = state.window();
    SearchOutput {
        query: state.query().to_query_string(),
        total_count: state.count().value().copied(),
        count_error: state.count().error().map(ToString::to_string),
        page: window.current_page,
        total_pages: window.total_pages(),
        pages: state.page_items().iter().map(ToString::to_string).collect(),
        results,
    }
}
