//! HTTP API.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/v1/search` | Ranked, highlighted, paginated search |
//! | `GET`  | `/api/v1/transcripts/{id}` | One chunk of a transcript (`offset`, `limit`, `q`) |
//! | `GET`  | `/health` | Health check (returns version) |
//!
//! # Error Contract
//!
//! ```json
//! { "error": { "code": "bad_request", "message": "query must not be empty" } }
//! ```
//!
//! Error codes: `bad_request` (400), `not_found` (404), `internal` (500).
//! Internal failures are logged with their cause and reported with a generic
//! message. A corpus read that exceeds `[server].store_timeout_ms` is
//! reported like a missing transcript on the chunk endpoint and as an
//! internal error on search.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so the browser UI can be
//! served from anywhere.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use transcript_search_core::chunk::{get_chunk, ChunkLimits};
use transcript_search_core::error::SearchError;
use transcript_search_core::models::{SearchResponse, TranscriptChunk};
use transcript_search_core::search::{search, SearchParams, SearchRequest};
use transcript_search_core::store::Store;

use crate::config::Config;
use crate::corpus::load_corpus;

/// Shared state handed to every handler.
#[derive(Clone)]
struct AppState {
    store: Arc<dyn Store>,
    params: SearchParams,
    limits: ChunkLimits,
    store_timeout: Duration,
}

/// Load the configured corpus and serve it until the process is stopped.
///
/// This is the entry point used by `tsx serve`.
pub async fn run_server(config: &Config) -> anyhow::Result<()> {
    let store = load_corpus(config)?;
    run_server_with_store(config, Arc::new(store)).await
}

/// Serve an already-built store on `[server].bind`.
pub async fn run_server_with_store(config: &Config, store: Arc<dyn Store>) -> anyhow::Result<()> {
    let app = router(config, store);

    let listener = tokio::net::TcpListener::bind(&config.server.bind).await?;
    info!(addr = %listener.local_addr()?, "search server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("search server stopped");
    Ok(())
}

/// Build the application router over `store`.
pub fn router(config: &Config, store: Arc<dyn Store>) -> Router {
    let state = AppState {
        store,
        params: config.search.params(),
        limits: config.chunking.limits(),
        store_timeout: config.server.store_timeout(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/search", post(handle_search))
        .route("/api/v1/transcripts/{id}", get(handle_transcript))
        .route("/health", get(handle_health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// ============ Error response ============

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    /// Machine-readable error code (`bad_request`, `not_found`, `internal`).
    code: String,
    message: String,
}

struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

fn bad_request(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_REQUEST,
        code: "bad_request".to_string(),
        message: message.into(),
    }
}

fn not_found(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::NOT_FOUND,
        code: "not_found".to_string(),
        message: message.into(),
    }
}

fn internal() -> AppError {
    AppError {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        code: "internal".to_string(),
        message: "internal server error".to_string(),
    }
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::Validation(msg) => bad_request(msg),
            e @ SearchError::NotFound(_) => not_found(e.to_string()),
            SearchError::Internal(cause) => {
                error!(%cause, "request failed");
                internal()
            }
        }
    }
}

// ============ GET /health ============

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============ POST /api/v1/search ============

/// Body rejections (malformed JSON, missing `query`, unknown `sort`, a
/// non-integer page) are reported as `bad_request`.
async fn handle_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, AppError> {
    let Json(req) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;

    let resp = tokio::time::timeout(
        state.store_timeout,
        search(&*state.store, &req, &state.params),
    )
    .await
    .map_err(|_| {
        error!(timeout_ms = state.store_timeout.as_millis() as u64, "search timed out");
        internal()
    })??;

    Ok(Json(resp))
}

// ============ GET /api/v1/transcripts/{id} ============

/// Raw query parameters; numbers are parsed by hand so malformed values
/// produce a proper error body.
#[derive(Debug, Deserialize)]
struct ChunkQuery {
    offset: Option<String>,
    limit: Option<String>,
    q: Option<String>,
}

fn parse_int_param(name: &str, value: Option<&str>) -> Result<Option<i64>, AppError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse::<i64>()
            .map(Some)
            .map_err(|_| bad_request(format!("{} must be an integer, got '{}'", name, v))),
    }
}

async fn handle_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<ChunkQuery>,
) -> Result<Json<TranscriptChunk>, AppError> {
    let offset = parse_int_param("offset", params.offset.as_deref())?;
    let limit = parse_int_param("limit", params.limit.as_deref())?;

    let chunk = tokio::time::timeout(
        state.store_timeout,
        get_chunk(
            &*state.store,
            &id,
            offset,
            limit,
            &state.limits,
            params.q.as_deref(),
        ),
    )
    .await
    .map_err(|_| {
        warn!(id = %id, "transcript read timed out");
        not_found(format!("document not available: {}", id))
    })??;

    Ok(Json(chunk))
}
