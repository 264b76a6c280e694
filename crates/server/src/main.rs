//! Energy Predictor - energy consumption prediction service
//!
//! Loads the trained model artifacts once at startup and serves predictions
//! over HTTP. When no usable model is found the service still answers every
//! request through the closed-form heuristic.

use anyhow::Result;
use predictor_lib::PredictorService;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod api;
mod config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with JSON output and env filter
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(fmt::layer().json())
        .init();

    info!("Starting energy-predictor");

    // Load configuration
    let config = config::ServerConfig::load()?;
    info!(models_dir = %config.models_dir, "Server configured");

    // Load all artifacts once; the service is immutable afterwards
    let service = Arc::new(PredictorService::load(&config.models_dir));
    info!(state = ?service.state(), "Predictor loaded");

    // Create shared application state
    let app_state = Arc::new(api::AppState::new(service));

    // Start the API server
    let api_handle = tokio::spawn(api::serve(config.api_port, app_state));

    // Wait for shutdown signal
    tokio::signal::ctrl_c().await?;
    info!("Shutting down");
    api_handle.abort();

    Ok(())
}
