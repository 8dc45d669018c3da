use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use log::{error, info};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;

use crate::charts;
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::filter::FilterSelection;
use crate::loader::DatasetCache;
use crate::pipeline::{self, RenderOutcome};
use crate::schema::ColumnSchema;

pub struct AppState {
    config: DashboardConfig,
    schema: ColumnSchema,
    cache: Mutex<DatasetCache>,
}

/// Sidebar selections as they arrive on the query string:
/// comma-separated lists. An absent parameter means "everything
/// selected" (the page-load default); an empty one means the user
/// deselected every value.
#[derive(Deserialize)]
struct SelectionQuery {
    therapists: Option<String>,
    therapy_types: Option<String>,
}

impl SelectionQuery {
    fn to_selection(&self, dataset: &Dataset, schema: &ColumnSchema) -> FilterSelection {
        let defaults = FilterSelection::all(dataset, schema);
        FilterSelection {
            therapists: self
                .therapists
                .as_deref()
                .map(parse_list)
                .unwrap_or(defaults.therapists),
            therapy_types: self
                .therapy_types
                .as_deref()
                .map(parse_list)
                .unwrap_or(defaults.therapy_types),
        }
    }
}

fn parse_list(raw: &str) -> std::collections::BTreeSet<String> {
    raw.split(',')
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

pub async fn run(config: DashboardConfig) -> Result<(), Box<dyn std::error::Error>> {
    let bind_address = config.bind_address.clone();

    let app_state = Arc::new(AppState {
        config,
        schema: ColumnSchema::default(),
        cache: Mutex::new(DatasetCache::new()),
    });

    let app = Router::new()
        .route("/", get(serve_dashboard))
        .route("/api/filters", get(filter_options))
        .route("/api/dashboard", get(dashboard_report))
        .route("/api/chart/cost_by_type.png", get(cost_chart))
        .route("/api/chart/duration_by_therapist.png", get(duration_chart))
        .nest_service("/static", ServeDir::new("static"))
        .with_state(app_state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("listening on http://{}", bind_address);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_dashboard() -> Html<&'static str> {
    Html(include_str!("./static/dashboard.html"))
}

/// Distinct values of the two facet columns, in dataset order, for the
/// sidebar multi-selects and their all-selected defaults.
async fn filter_options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut cache = state.cache.lock().unwrap();
    let (dataset, load_error) = cache.get(&state.config);

    Json(serde_json::json!({
        "therapists": dataset.distinct_text(&state.schema.therapist),
        "therapy_types": dataset.distinct_text(&state.schema.therapy_type),
        "load_error": load_error,
    }))
}

/// One full pipeline pass: KPIs and both grouped aggregates, or the
/// halt that stopped the cycle.
async fn dashboard_report(
    Query(params): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    let mut cache = state.cache.lock().unwrap();
    let (dataset, load_error) = cache.get(&state.config);
    let selection = params.to_selection(dataset, &state.schema);

    match pipeline::render(dataset, &state.schema, &selection) {
        RenderOutcome::Report(report) => Json(serde_json::json!({
            "status": "ok",
            "load_error": load_error,
            "report": report,
        })),
        RenderOutcome::Halted(halt) => Json(serde_json::json!({
            "status": halt.kind(),
            "message": halt.message(),
            "load_error": load_error,
        })),
    }
}

async fn cost_chart(
    Query(params): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut cache = state.cache.lock().unwrap();
    let (dataset, _) = cache.get(&state.config);
    let selection = params.to_selection(dataset, &state.schema);

    match pipeline::render(dataset, &state.schema, &selection) {
        RenderOutcome::Report(report) => {
            png_response(charts::cost_by_therapy_type_chart(&report.cost_by_therapy_type))
        }
        RenderOutcome::Halted(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn duration_chart(
    Query(params): Query<SelectionQuery>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let mut cache = state.cache.lock().unwrap();
    let (dataset, _) = cache.get(&state.config);
    let selection = params.to_selection(dataset, &state.schema);

    match pipeline::render(dataset, &state.schema, &selection) {
        RenderOutcome::Report(report) => {
            png_response(charts::duration_by_therapist_chart(&report.duration_by_therapist))
        }
        RenderOutcome::Halted(_) => StatusCode::NO_CONTENT.into_response(),
    }
}

fn png_response(result: Result<Vec<u8>, Box<dyn std::error::Error>>) -> Response {
    match result {
        Ok(png) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "image/png")
            .header(header::CACHE_CONTROL, "no-store")
            .body(axum::body::Body::from(png))
            .unwrap(),
        Err(e) => {
            error!("chart rendering failed: {}", e);
            Response::builder()
                .status(StatusCode::INTERNAL_SERVER_ERROR)
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::json!({
                        "status": "error",
                        "message": e.to_string(),
                    })
                    .to_string(),
                ))
                .unwrap()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_lists_parse_to_sets() {
        let parsed = parse_list("Alice,Bob,Alice");
        assert_eq!(parsed.len(), 2);
        assert!(parsed.contains("Alice"));
        assert!(parsed.contains("Bob"));
        assert!(parse_list("").is_empty());
    }

    #[test]
    fn absent_parameters_default_to_all_values() {
        use crate::dataset::Value;

        let schema = ColumnSchema::default();
        let mut ds = Dataset::new(vec![schema.therapist.clone(), schema.therapy_type.clone()]);
        ds.push_row(vec![Value::Text("Alice".into()), Value::Text("CBT".into())]);
        ds.push_row(vec![Value::Text("Bob".into()), Value::Text("EMDR".into())]);

        let query = SelectionQuery {
            therapists: None,
            therapy_types: Some("CBT".to_string()),
        };
        let selection = query.to_selection(&ds, &schema);
        assert_eq!(selection.therapists.len(), 2);
        assert_eq!(selection.therapy_types.len(), 1);

        let cleared = SelectionQuery {
            therapists: Some(String::new()),
            therapy_types: None,
        };
        assert!(cleared.to_selection(&ds, &schema).therapists.is_empty());
    }
}
