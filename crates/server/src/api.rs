//! HTTP API for predictions, health checks, and Prometheus metrics

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use predictor_lib::{PredictorService, ServiceHealth};
use prometheus::{Encoder, TextEncoder};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

const API_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PredictorService>,
}

impl AppState {
    pub fn new(service: Arc<PredictorService>) -> Self {
        Self { service }
    }
}

/// API information for the root path
async fn home(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let info = state.service.model_info();
    Json(json!({
        "message": "Energy Consumption Prediction API",
        "status": "running",
        "model_loaded": info.model_loaded,
        "model_descriptor": info.model_descriptor,
        "version": API_VERSION,
        "endpoints": {
            "/": "API information",
            "/predict": "POST - Make energy consumption prediction",
            "/model-info": "GET - Get model information",
            "/health": "GET - Health check",
            "/metrics": "GET - Prometheus metrics"
        }
    }))
}

/// Make a prediction - failure results get 400, successful ones 200
async fn predict(
    State(state): State<Arc<AppState>>,
    Json(request): Json<Value>,
) -> impl IntoResponse {
    let response = state.service.predict(&request);
    let status_code = if response.success {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    (status_code, Json(response))
}

/// Health check - 200 while servable, 503 only on failed initialization
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.service.health();
    let status_code = match health.status {
        ServiceHealth::Healthy => StatusCode::OK,
        ServiceHealth::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };
    (status_code, Json(health))
}

/// Model information, served even when running on the heuristic path
async fn model_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.service.model_info())
}

/// Prometheus metrics endpoint
async fn metrics() -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    encoder.encode(&metric_families, &mut buffer).unwrap();

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/predict", post(predict))
        .route("/health", get(health))
        .route("/model-info", get(model_info))
        .route("/metrics", get(metrics))
        .with_state(state)
}

/// Start the API server
pub async fn serve(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
