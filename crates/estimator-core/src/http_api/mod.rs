use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use parking_lot::RwLock;
use serde::Serialize;
use serde_json::json;

use crate::{EstimateError, EstimateInput, EstimationResult};

/// Estimator state held by the server: the current input and the last result
/// computed from it. Replacing the input drops the stale result.
#[derive(Debug, Default)]
pub struct EstimatorState {
    input: EstimateInput,
    result: Option<EstimationResult>,
}

impl EstimatorState {
    pub fn new(input: EstimateInput) -> Self {
        Self {
            input,
            result: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    estimator: Arc<RwLock<EstimatorState>>,
}

impl AppState {
    pub fn new(input: EstimateInput) -> Self {
        Self {
            estimator: Arc::new(RwLock::new(EstimatorState::new(input))),
        }
    }

    fn estimator(&self) -> Arc<RwLock<EstimatorState>> {
        self.estimator.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Invalid(String),
}

impl ApiError {
    fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }
}

impl From<EstimateError> for ApiError {
    fn from(value: EstimateError) -> Self {
        ApiError::Invalid(value.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(message) => {
                let body = Json(ErrorBody {
                    error: "not_found",
                    message,
                });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Invalid(message) => {
                let body = Json(ErrorBody {
                    error: "invalid_request",
                    message,
                });
                (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
            }
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/input", get(get_input).put(replace_input))
        .route("/compute", post(compute))
        .route("/result", get(get_result))
        .route("/estimate", post(estimate_once))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, input: EstimateInput) -> std::io::Result<()> {
    let state = AppState::new(input);
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "estimator HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn get_input(State(state): State<AppState>) -> Json<EstimateInput> {
    let estimator = state.estimator();
    let input = {
        let guard = estimator.read();
        guard.input.clone()
    };
    Json(input)
}

async fn replace_input(
    State(state): State<AppState>,
    Json(input): Json<EstimateInput>,
) -> Json<EstimateInput> {
    let estimator = state.estimator();
    {
        let mut guard = estimator.write();
        guard.input = input.clone();
        guard.result = None;
    }
    tracing::debug!(variant = input.kind().as_str(), "estimator input replaced");
    Json(input)
}

async fn compute(State(state): State<AppState>) -> Result<Json<EstimationResult>, ApiError> {
    let estimator = state.estimator();
    let snapshot = {
        let guard = estimator.read();
        guard.input.clone()
    };
    let result = snapshot.estimate()?;
    {
        let mut guard = estimator.write();
        // Only cache if the input was not replaced while computing.
        if guard.input == snapshot {
            guard.result = Some(result.clone());
        }
    }
    Ok(Json(result))
}

async fn get_result(State(state): State<AppState>) -> Result<Json<EstimationResult>, ApiError> {
    let estimator = state.estimator();
    let result = {
        let guard = estimator.read();
        guard.result.clone()
    };
    result
        .map(Json)
        .ok_or_else(|| ApiError::not_found("no result computed for the current input"))
}

async fn estimate_once(
    Json(input): Json<EstimateInput>,
) -> Result<Json<EstimationResult>, ApiError> {
    Ok(Json(input.estimate()?))
}
