use anyhow::Result;
use axum::{extract::{Query, State}, http::{HeaderMap, StatusCode}, routing::{get, post}, Json, Router};
use docsearch_core::{normalize_path, Error, Hits, IndexStats, InvertedIndex};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, String);

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_mode")]
    pub mode: String,
    #[serde(default)]
    pub rank: bool,
}
fn default_mode() -> String { "AND".into() }

#[derive(Deserialize)]
pub struct PhraseParams {
    pub q: String,
}

#[derive(Deserialize)]
pub struct DocParams {
    pub path: String,
}

#[derive(Deserialize)]
pub struct PathBody {
    pub path: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub mode: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub path: String,
    pub text: String,
    pub tokens: usize,
}

#[derive(Serialize)]
pub struct MutationResponse {
    pub path: String,
    pub documents: usize,
}

#[derive(Serialize)]
pub struct FolderFailure {
    pub path: String,
    pub error: String,
}

#[derive(Serialize)]
pub struct FolderResponse {
    pub indexed: Vec<String>,
    pub failed: Vec<FolderFailure>,
    pub documents: usize,
}

/// The index behind a single reader-writer lock: queries read, mutations write.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<RwLock<InvertedIndex>>,
    pub admin_token: Option<String>,
}

/// Index every `.txt` file in `data_dir` and build the router around it.
pub fn build_app(data_dir: String) -> Result<Router> {
    let (index, report) = InvertedIndex::build_index(&data_dir);
    for (path, err) in &report.failed {
        tracing::warn!(path = %path.display(), error = %err, "skipped source");
    }
    tracing::info!(data_dir = %data_dir, documents = index.len(), "index loaded");
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    Ok(build_router(index, admin_token))
}

pub fn build_router(index: InvertedIndex, admin_token: Option<String>) -> Router {
    let app_state = AppState { index: Arc::new(RwLock::new(index)), admin_token };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/stats", get(stats_handler))
        .route("/search", get(search_handler))
        .route("/phrase", get(phrase_handler))
        .route("/doc", get(doc_handler))
        .route("/index/add", post(add_handler))
        .route("/index/update", post(update_handler))
        .route("/index/delete", post(delete_handler))
        .route("/index/folder", post(folder_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn hits_to_results(hits: &Hits<'_>) -> Vec<SearchHit> {
    hits.entries()
        .into_iter()
        .map(|(path, score)| SearchHit { path: path.to_string(), score })
        .collect()
}

fn status_of(err: &Error) -> StatusCode {
    match err {
        Error::NotFound { .. } => StatusCode::NOT_FOUND,
        Error::ZeroDocumentFrequency { .. } | Error::EmptyIndex => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn api_error(err: Error) -> ApiError {
    (status_of(&err), err.to_string())
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<IndexStats> {
    Json(state.index.read().stats())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = Instant::now();
    let index = state.index.read();
    let hits = index.search_by_name(&params.q, &params.mode, params.rank).map_err(api_error)?;
    let results = hits_to_results(&hits);
    let elapsed = start.elapsed();
    Ok(Json(SearchResponse { query: params.q, mode: params.mode, took_s: elapsed.as_secs_f64(), total_hits: results.len(), results }))
}

pub async fn phrase_handler(State(state): State<AppState>, Query(params): Query<PhraseParams>) -> Json<SearchResponse> {
    let start = Instant::now();
    let index = state.index.read();
    let results = hits_to_results(&Hits::Unranked(index.phrase_search(&params.q)));
    let elapsed = start.elapsed();
    Json(SearchResponse { query: params.q, mode: "phrase".into(), took_s: elapsed.as_secs_f64(), total_hits: results.len(), results })
}

pub async fn doc_handler(State(state): State<AppState>, Query(params): Query<DocParams>) -> Result<Json<DocResponse>, ApiError> {
    let index = state.index.read();
    let doc = index
        .document(&params.path)
        .or_else(|| index.document(&normalize_path(&params.path).to_string_lossy()))
        .ok_or((StatusCode::NOT_FOUND, "not found".to_string()))?;
    Ok(Json(DocResponse { path: doc.path().to_string(), text: doc.fulltext().to_string(), tokens: doc.len() }))
}

// --- Admin endpoints ---
async fn add_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<PathBody>) -> Result<Json<MutationResponse>, ApiError> {
    authorize(&state, &headers)?;
    let mut index = state.index.write();
    let path = index.add_document(&body.path).map_err(api_error)?;
    Ok(Json(MutationResponse { path, documents: index.len() }))
}

async fn update_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<PathBody>) -> Result<Json<MutationResponse>, ApiError> {
    authorize(&state, &headers)?;
    let mut index = state.index.write();
    let path = index.update_document(&body.path).map_err(api_error)?;
    Ok(Json(MutationResponse { path, documents: index.len() }))
}

async fn delete_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<PathBody>) -> Result<Json<MutationResponse>, ApiError> {
    authorize(&state, &headers)?;
    let mut index = state.index.write();
    let removed = index.delete_path(&body.path).map_err(api_error)?;
    Ok(Json(MutationResponse { path: removed.path().to_string(), documents: index.len() }))
}

async fn folder_handler(State(state): State<AppState>, headers: HeaderMap, Json(body): Json<PathBody>) -> Result<Json<FolderResponse>, ApiError> {
    authorize(&state, &headers)?;
    let mut index = state.index.write();
    let report = index.add_folder(&body.path);
    let failed = report
        .failed
        .iter()
        .map(|(path, err)| FolderFailure { path: path.to_string_lossy().into_owned(), error: err.to_string() })
        .collect();
    Ok(Json(FolderResponse { indexed: report.indexed, failed, documents: index.len() }))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
