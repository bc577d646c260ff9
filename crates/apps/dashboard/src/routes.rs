use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{Method, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use dataset::DatasetSource;
use foundation::DateRange;
use parking_lot::Mutex;
use presenter::{Dashboard, PageLayout, Presenter};
use runtime::Metrics;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::page::INDEX_HTML;

#[derive(Clone)]
pub struct AppState {
    pub presenter: Arc<Presenter>,
    pub metrics: Arc<Mutex<Metrics>>,
    pub summary: Arc<DatasetSummary>,
}

impl AppState {
    pub fn new(presenter: Arc<Presenter>, source: &DatasetSource) -> Self {
        let summary = DatasetSummary::new(&presenter, source);
        let mut metrics = Metrics::new();
        metrics.set_dataset_rows(summary.rows);
        Self {
            presenter,
            metrics: Arc::new(Mutex::new(metrics)),
            summary: Arc::new(summary),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DatasetSummary {
    pub url: String,
    pub format: String,
    pub rows: usize,
    pub locations: usize,
    pub dates: DateRange,
}

impl DatasetSummary {
    fn new(presenter: &Presenter, source: &DatasetSource) -> Self {
        let context = presenter.context();
        Self {
            url: source.url.clone(),
            format: source.format.to_string(),
            rows: context.table().len(),
            locations: context.table().locations().len(),
            dates: context.bounds(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    #[serde(default)]
    pub inputs: Map<String, Value>,
}

fn api_error(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<Value>) {
    (status, Json(json!({ "error": message.into() })))
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS]);

    Router::new()
        .route("/", get(index))
        .route("/healthz", get(healthz))
        .route("/status", get(status))
        .route("/api/layout", get(get_layout))
        .route("/api/figure", get(get_figure))
        .route("/api/update", post(post_update))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn healthz() -> Response {
    (StatusCode::OK, "ok").into_response()
}

async fn status(State(state): State<AppState>) -> Response {
    let metrics = state.metrics.lock().clone();
    Json(json!({
        "status": "ready",
        "dataset": &*state.summary,
        "metrics": metrics,
    }))
    .into_response()
}

async fn get_layout(State(state): State<AppState>) -> Json<PageLayout> {
    Json(state.presenter.layout().clone())
}

async fn get_figure(State(state): State<AppState>) -> Response {
    let figure = state.presenter.redraw(&state.presenter.default_selection());
    let rows = figure.trace().map_or(0, |t| t.locations.len());
    state.metrics.lock().record_redraw(rows);
    Json(figure).into_response()
}

/// Applies the page's current control values and returns the redrawn figure.
///
/// Every request carries the full input set, so each one gets a fresh session.
async fn post_update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(v) => v,
        Err(rejection) => {
            state.metrics.lock().record_rejected_update();
            return api_error(StatusCode::BAD_REQUEST, rejection.body_text()).into_response();
        }
    };

    let mut dashboard = Dashboard::new(Arc::clone(&state.presenter));
    match dashboard.input(&req.inputs) {
        Ok(figure) => {
            let figure = figure.clone();
            state.metrics.lock().record_redraw(dashboard.rows());
            Json(figure).into_response()
        }
        Err(err) => {
            warn!("update rejected: {err}");
            state.metrics.lock().record_rejected_update();
            api_error(StatusCode::BAD_REQUEST, err.to_string()).into_response()
        }
    }
}
