//! Server configuration

use anyhow::Result;
use serde::Deserialize;

/// Predictor server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding the persisted model artifacts
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
}

fn default_api_port() -> u16 {
    5001
}

fn default_models_dir() -> String {
    std::env::var("MODELS_DIR").unwrap_or_else(|_| "models".to_string())
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("PREDICTOR"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| ServerConfig {
            api_port: default_api_port(),
            models_dir: default_models_dir(),
        }))
    }
}
