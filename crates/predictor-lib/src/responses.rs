//! Wire types returned by the predictor service

use crate::confidence::Quality;
use serde::{Deserialize, Serialize};

/// Successful prediction payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub prediction: f64,
    pub confidence: f64,
    pub unit: String,
    pub model_descriptor: String,
    pub features_used: usize,
    pub timestamp: String,
    pub quality: Quality,
    pub fallback_mode: bool,
}

/// Envelope for every `predict()` outcome
///
/// Serializes either as `{success: true, ...prediction fields}` or as
/// `{success: false, error}`. No call ever surfaces an error any other way.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResponse {
    pub success: bool,
    #[serde(flatten)]
    pub result: Option<Prediction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PredictionResponse {
    pub fn ok(result: Prediction) -> Self {
        Self {
            success: true,
            result: Some(result),
            error: None,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        Self {
            success: false,
            result: None,
            error: Some(error.to_string()),
        }
    }
}

/// Overall service health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceHealth {
    Healthy,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: ServiceHealth,
    pub model_loaded: bool,
    pub timestamp: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScalersAvailable {
    #[serde(rename = "X")]
    pub x: bool,
    pub y: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_loaded: bool,
    pub model_descriptor: String,
    pub feature_columns: Vec<String>,
    pub num_features: usize,
    pub scalers_available: ScalersAvailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_flattens_prediction() {
        let response = PredictionResponse::ok(Prediction {
            prediction: 45.2,
            confidence: 97.1,
            unit: "kWh".into(),
            model_descriptor: "Ridge Regression".into(),
            features_used: 45,
            timestamp: "2024-06-12T14:00:00+00:00".into(),
            quality: Quality::High,
            fallback_mode: false,
        });
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["prediction"], 45.2);
        assert_eq!(json["unit"], "kWh");
        assert_eq!(json["quality"], "High");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failure_envelope_carries_only_error() {
        let response = PredictionResponse::failure("input data must be a JSON object");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], false);
        assert!(json.get("prediction").is_none());
        assert!(!json["error"].as_str().unwrap().is_empty());
    }
}
