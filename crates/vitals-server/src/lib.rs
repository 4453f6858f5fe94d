//! HTTP query surface for the vitals monitoring agent.
//!
//! Thin read-only layer over the sample store: the latest sample, a sliding
//! time window of history, a health check, and a JSON API index at `/`.
//! Handlers never mutate the store; the sampling loop is the only writer.

use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::{Method, StatusCode, header},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};

use vitals_core::{Sample, SampleStore};

/// Window applied when the caller omits `seconds` or sends something
/// unparseable.
const DEFAULT_WINDOW_SECS: i64 = 300;

/// Shared server state.
struct AppState {
    store: Arc<SampleStore>,
    /// Collection interval, echoed so clients can space chart points.
    interval_secs: u64,
}

#[derive(Deserialize)]
struct HistoryParams {
    /// Window in seconds. Kept as a string so malformed values fall back to
    /// the default instead of surfacing a 400.
    seconds: Option<String>,
}

#[derive(Debug, Serialize)]
struct HistoryResponse {
    interval_sec: u64,
    window_sec: i64,
    samples: Vec<Sample>,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    samples: usize,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
}

async fn handle_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        samples: state.store.len(),
    })
}

/// `GET /metrics/latest` — the most recent sample, or 404 while the store
/// is still empty. An empty store is a real not-found, never a zeroed-out
/// placeholder sample.
async fn handle_latest(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Sample>, (StatusCode, Json<ErrorResponse>)> {
    match state.store.latest() {
        Some(sample) => Ok(Json(sample)),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "no samples collected yet",
            }),
        )),
    }
}

/// `GET /metrics/history?seconds=N` — stored samples newer than
/// `now - seconds`, oldest-first. The default window is applied here; the
/// store itself accepts any integer, including degenerate ones.
async fn handle_history(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HistoryParams>,
) -> Json<HistoryResponse> {
    let window_sec = params
        .seconds
        .as_deref()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_WINDOW_SECS);

    Json(HistoryResponse {
        interval_sec: state.interval_secs,
        window_sec,
        samples: state.store.history(window_sec),
    })
}

async fn handle_index(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "vitals agent",
        "version": vitals_core::VERSION,
        "interval_sec": state.interval_secs,
        "endpoints": {
            "/": "This API index",
            "/health": "Agent health and stored sample count",
            "/metrics/latest": "Most recent sample (404 until the first collection lands)",
            "/metrics/history": {
                "method": "GET",
                "description": "Samples from the last N seconds, oldest-first",
                "params": {
                    "seconds": "Window in seconds (default: 300)",
                }
            },
        },
    }))
}

/// Build the axum router.
///
/// Every route carries permissive CORS so browser dashboards served from
/// another origin can read the API; the layer also answers OPTIONS
/// preflights. The surface is read-only, so only GET is allowed through.
fn build_router(store: Arc<SampleStore>, interval_secs: u64) -> Router {
    let state = Arc::new(AppState {
        store,
        interval_secs,
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(handle_index))
        .route("/health", get(handle_health))
        .route("/metrics/latest", get(handle_latest))
        .route("/metrics/history", get(handle_history))
        .with_state(state)
        .layer(cors)
}

/// Run the HTTP server until `shutdown` resolves.
///
/// Bind errors propagate — a port that cannot be claimed is fatal at
/// startup, not something to retry.
pub async fn run_server(
    store: Arc<SampleStore>,
    interval_secs: u64,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let app = build_router(store, interval_secs);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    log::info!("http server listening on {addr}");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await
}
