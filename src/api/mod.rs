use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::warn;

use crate::engine::{Engine, PricingReport};
use crate::error::EngineError;
use crate::model::GameState;
use crate::request::PricingRequest;

#[derive(Clone)]
pub struct AppState {
    pub engine: Engine,
}

/// Build the Axum router for the pricing API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/config", get(config_handler))
        .route("/api/leagues", get(leagues_handler))
        .route("/api/scenarios", get(scenarios_handler))
        .route("/api/price", post(price_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

type ApiError = (StatusCode, Json<Value>);

fn error_response(err: EngineError) -> ApiError {
    let status = match err {
        EngineError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Distribution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": err.to_string() })))
}

/// GET /api/health
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// GET /api/config
async fn config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.config().clone())
}

/// GET /api/leagues
async fn leagues_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.engine.leagues().iter().cloned().collect::<Vec<_>>())
}

#[derive(Serialize)]
struct ScenarioInfo {
    label: String,
    description: &'static str,
    factor: f64,
}

/// GET /api/scenarios
async fn scenarios_handler() -> impl IntoResponse {
    let scenarios: Vec<ScenarioInfo> = GameState::KNOWN
        .iter()
        .map(|s| ScenarioInfo {
            label: s.label().to_string(),
            description: s.description(),
            factor: s.factor(),
        })
        .collect();
    Json(scenarios)
}

/// POST /api/price
async fn price_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PricingRequest>,
) -> Result<Json<PricingReport>, ApiError> {
    state.engine.evaluate(&req).map(Json).map_err(|e| {
        warn!("Rejected pricing request: {}", e);
        error_response(e)
    })
}
