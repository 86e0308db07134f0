//! HTTP surface: a single `GET /` endpoint classifying the `q` query parameter.

use std::sync::Arc;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use log::{debug, error};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::classifier::{Classifier, ClassifierError, Prediction};

/// Text classified when the request carries no (or an empty) `q` parameter.
pub const DEFAULT_QUERY: &str = "Hello World";

/// Anything that can turn text into a labelled prediction.
///
/// Handlers only see this trait, so the router can be exercised without model artifacts.
pub trait Predictor: Send + Sync + 'static {
    fn predict(&self, text: &str) -> Result<Prediction, ClassifierError>;
}

impl Predictor for Classifier {
    fn predict(&self, text: &str) -> Result<Prediction, ClassifierError> {
        Classifier::predict(self, text)
    }
}

/// Shared application state, built once at startup and read-only afterwards
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
}

impl AppState {
    pub fn new(predictor: impl Predictor) -> Self {
        Self { predictor: Arc::new(predictor) }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub q: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QueryResponse {
    pub query: String,
    pub results: Prediction,
}

#[derive(Debug)]
pub enum ApiError {
    Classifier(ClassifierError),
    Internal(String),
}

impl From<ClassifierError> for ApiError {
    fn from(err: ClassifierError) -> Self {
        ApiError::Classifier(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let detail = match self {
            ApiError::Classifier(e) => e.to_string(),
            ApiError::Internal(msg) => msg,
        };
        error!("Request failed: {}", detail);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "detail": detail }))).into_response()
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(read_index))
        .with_state(state)
}

async fn read_index(
    State(state): State<AppState>,
    Query(params): Query<IndexParams>,
) -> Result<Json<QueryResponse>, ApiError> {
    let query = params.q
        .filter(|q| !q.is_empty())
        .unwrap_or_else(|| DEFAULT_QUERY.to_string());
    debug!("Received query: {}", query);

    // Forward passes are synchronous; keep them off the async workers.
    let predictor = Arc::clone(&state.predictor);
    let text = query.clone();
    let results = tokio::task::spawn_blocking(move || predictor.predict(&text))
        .await
        .map_err(|e| ApiError::Internal(format!("Inference task failed: {}", e)))??;

    Ok(Json(QueryResponse { query, results }))
}
