//! HTTP query API.
//!
//! Endpoints:
//!   GET /motifQuery?code=…&num=…            → nearest motifs (+ name, description)
//!   GET /traditionQuery?code=…&num=…        → nearest traditions
//!   GET /compareTraditions?trad1=…&trad2=…  → common / only-trad1 / only-trad2 motifs
//!   GET /fetchTraditionDict                 → coords.json as loaded
//!   GET /fetchMotifDistr?code=…             → sites where the motif is present
//!   GET /fetchMotifList                     → new_motif_list.json as loaded
//!
//! `num` may be omitted or `-1` for every neighbor. Any other path or method
//! is a 400.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tracing::{error, info};

use folkmap_dataset::Dataset;
use folkmap_knn::{CollectionKind, KnnError, Neighbor, NeighborCount, QueryEngine};

const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

// ── Shared state ──────────────────────────────────────────────────────────────

/// Everything a request needs, built once before serving.
pub struct AppState {
    pub engine: QueryEngine,
    pub dataset: Dataset,
}

type Params = Query<Vec<(String, String)>>;

// ── Router ────────────────────────────────────────────────────────────────────

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/motifQuery", get(motif_query))
        .route("/traditionQuery", get(tradition_query))
        .route("/compareTraditions", get(compare_traditions))
        .route("/fetchTraditionDict", get(fetch_tradition_dict))
        .route("/fetchMotifDistr", get(fetch_motif_distr))
        .route("/fetchMotifList", get(fetch_motif_list))
        .fallback(bad_path)
        .method_not_allowed_fallback(bad_path)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(state: Arc<AppState>, port: u16) -> std::io::Result<()> {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "folkmap query API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("received SIGINT, shutting down");
        })
        .await
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Knn(KnnError),
}

impl From<KnnError> for ApiError {
    fn from(e: KnnError) -> Self {
        ApiError::Knn(e)
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Knn(KnnError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Knn(KnnError::InvalidCount(_)) => StatusCode::BAD_REQUEST,
            ApiError::Knn(KnnError::DimensionMismatch { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::BadRequest(m) => m.clone(),
            ApiError::Knn(e) => {
                if !e.is_caller_error() {
                    error!(error = %e, "dataset integrity failure while answering query");
                }
                e.to_string()
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

// ── Parameter helpers ─────────────────────────────────────────────────────────

fn values<'a>(params: &'a [(String, String)], key: &str) -> Vec<&'a str> {
    params
        .iter()
        .filter(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .collect()
}

/// The value of `key`, which must occur exactly once.
pub fn single_param<'a>(params: &'a [(String, String)], key: &str) -> Result<&'a str, ApiError> {
    match values(params, key).as_slice() {
        [one] => Ok(*one),
        [] => Err(ApiError::BadRequest(format!("missing parameter '{key}'"))),
        _ => Err(ApiError::BadRequest(format!("parameter '{key}' given more than once"))),
    }
}

/// The first value of `key`, which must occur at least once.
pub fn first_param<'a>(params: &'a [(String, String)], key: &str) -> Result<&'a str, ApiError> {
    values(params, key)
        .first()
        .copied()
        .ok_or_else(|| ApiError::BadRequest(format!("missing parameter '{key}'")))
}

/// `num` absent means every neighbor; otherwise it must be one integer.
pub fn neighbor_count(params: &[(String, String)]) -> Result<NeighborCount, ApiError> {
    match values(params, "num").as_slice() {
        [] => Ok(NeighborCount::All),
        [raw] => {
            let n: i64 = raw
                .trim()
                .parse()
                .map_err(|_| ApiError::BadRequest(format!("num must be an integer, got '{raw}'")))?;
            Ok(NeighborCount::from_raw(n)?)
        }
        _ => Err(ApiError::BadRequest("parameter 'num' given more than once".into())),
    }
}

// ── Ranking handlers ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct NeighborJson {
    code: String,
    distance: String,
}

#[derive(Debug, Serialize)]
struct MotifNeighborJson {
    code: String,
    distance: String,
    name: String,
    description: String,
}

fn rank(
    state: &AppState,
    kind: CollectionKind,
    params: &[(String, String)],
) -> Result<Vec<Neighbor>, ApiError> {
    let code = single_param(params, "code")?;
    let count = neighbor_count(params)?;
    Ok(state.engine.nearest(kind, code, count)?)
}

async fn motif_query(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Vec<MotifNeighborJson>>, ApiError> {
    let metric = &state.engine.collection(CollectionKind::Motifs).metric;
    let body = rank(&state, CollectionKind::Motifs, &params)?
        .into_iter()
        .map(|n| {
            let desc = state.dataset.description_for(&n.code).cloned().unwrap_or_default();
            MotifNeighborJson {
                distance: metric.render(n.distance),
                code: n.code,
                name: desc.name,
                description: desc.description,
            }
        })
        .collect();
    Ok(Json(body))
}

async fn tradition_query(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<Vec<NeighborJson>>, ApiError> {
    let metric = &state.engine.collection(CollectionKind::Traditions).metric;
    let body = rank(&state, CollectionKind::Traditions, &params)?
        .into_iter()
        .map(|n| NeighborJson {
            distance: metric.render(n.distance),
            code: n.code,
        })
        .collect();
    Ok(Json(body))
}

// ── Comparison handler ────────────────────────────────────────────────────────

async fn compare_traditions(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Json<serde_json::Value>, ApiError> {
    let first = first_param(&params, "trad1")?;
    let second = first_param(&params, "trad2")?;
    let cmp = state.engine.compare_traditions(first, second)?;

    // Keyed by the tradition codes themselves. Comparing a tradition with
    // itself leaves a single (empty) list under its code.
    let mut body = serde_json::Map::new();
    body.insert("common".into(), serde_json::json!(cmp.common));
    body.insert(first.to_string(), serde_json::json!(cmp.only_first));
    body.insert(second.to_string(), serde_json::json!(cmp.only_second));
    Ok(Json(serde_json::Value::Object(body)))
}

// ── Dataset handlers ──────────────────────────────────────────────────────────

async fn fetch_tradition_dict(State(state): State<Arc<AppState>>) -> Response {
    raw_json(state.dataset.coords_json())
}

async fn fetch_motif_list(State(state): State<Arc<AppState>>) -> Response {
    raw_json(state.dataset.motif_list_json())
}

async fn fetch_motif_distr(
    State(state): State<Arc<AppState>>,
    Query(params): Params,
) -> Result<Response, ApiError> {
    let code = single_param(&params, "code")?;
    let sites = state
        .dataset
        .motif_distribution(code)
        .ok_or_else(|| KnnError::NotFound(code.to_string()))?;
    Ok(Json(sites).into_response())
}

fn raw_json(bytes: &[u8]) -> Response {
    ([(header::CONTENT_TYPE, JSON_CONTENT_TYPE)], bytes.to_vec()).into_response()
}

async fn bad_path(uri: Uri) -> (StatusCode, String) {
    let path = uri.path().trim_start_matches('/');
    (StatusCode::BAD_REQUEST, format!("Bad request: {path}"))
}
