//! Prediction orchestration
//!
//! `PredictorService` is built once at process start: it loads the model
//! artifact, scalers, and feature schema, resolves the service state, and
//! then serves arbitrarily many `predict()` calls without mutation. Every
//! internal failure is converted into a tagged failure response; nothing
//! escapes as a panic or error type.

use crate::confidence::{quality_label, ConfidencePath, JitterSource, ThreadJitter};
use crate::error::PredictError;
use crate::features::build_features;
use crate::model::{heuristic_estimate, ModelArtifact, FALLBACK_DESCRIPTOR};
use crate::observability::PredictorMetrics;
use crate::responses::{
    HealthStatus, ModelInfo, Prediction, PredictionResponse, ScalersAvailable, ServiceHealth,
};
use crate::scaler::{RobustScalerParams, ScalerAdapter};
use crate::schema::{assemble, FeatureSchema};
use chrono::Utc;
use serde_json::Value;
use std::fs;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

pub const SCALER_X_FILE: &str = "scaler_x.json";
pub const SCALER_Y_FILE: &str = "scaler_y.json";
pub const FEATURE_COLS_FILE: &str = "feature_cols.json";

/// Lifecycle state resolved at load time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceState {
    /// A trained model artifact is loaded and usable
    Ready,
    /// No usable model; the heuristic answers every request
    ReadyFallback,
    /// Catastrophic configuration error, requests are rejected
    Failed,
}

/// Immutable prediction service, safe to share across request handlers
pub struct PredictorService {
    state: ServiceState,
    model: ModelArtifact,
    scalers: ScalerAdapter,
    schema: FeatureSchema,
    jitter: Box<dyn JitterSource>,
    metrics: PredictorMetrics,
}

fn load_json_artifact<T: serde::de::DeserializeOwned>(
    path: &Path,
    what: &str,
) -> Result<Option<T>, PredictError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path).map_err(|e| PredictError::Load {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    let parsed = serde_json::from_str(&raw).map_err(|e| PredictError::Load {
        path: path.display().to_string(),
        reason: format!("{} is malformed: {}", what, e),
    })?;
    Ok(Some(parsed))
}

fn load_optional<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Option<T> {
    match load_json_artifact(path, what) {
        Ok(found) => found,
        Err(e) => {
            // Load errors are recorded and the artifact is treated as absent
            warn!(error = %e, "ignoring unusable {}", what);
            None
        }
    }
}

impl PredictorService {
    /// Load all artifacts from the models directory and resolve the state
    ///
    /// Never returns an error: missing or corrupt artifacts degrade the
    /// service to `ReadyFallback`. Only a models path that exists and is not
    /// a directory produces `Failed`.
    pub fn load(models_dir: impl AsRef<Path>) -> Self {
        let dir = models_dir.as_ref();
        let metrics = PredictorMetrics::new();

        if dir.exists() && !dir.is_dir() {
            warn!(path = %dir.display(), "models path exists but is not a directory");
            return Self {
                state: ServiceState::Failed,
                model: ModelArtifact::Unavailable,
                scalers: ScalerAdapter::default(),
                schema: FeatureSchema::default(),
                jitter: Box::new(ThreadJitter),
                metrics,
            };
        }

        let schema: FeatureSchema = load_optional(&dir.join(FEATURE_COLS_FILE), "feature schema")
            .unwrap_or_default();
        let model = ModelArtifact::load(dir, schema.len());
        let scalers = ScalerAdapter::new(
            load_optional::<RobustScalerParams>(&dir.join(SCALER_X_FILE), "input scaler"),
            load_optional::<RobustScalerParams>(&dir.join(SCALER_Y_FILE), "output scaler"),
        );

        let state = if model.is_loaded() {
            ServiceState::Ready
        } else {
            ServiceState::ReadyFallback
        };
        metrics.set_model_descriptor(&model.descriptor());
        info!(
            state = ?state,
            model = %model.descriptor(),
            num_features = schema.len(),
            scaler_x = scalers.has_x(),
            scaler_y = scalers.has_y(),
            "predictor service loaded"
        );

        Self {
            state,
            model,
            scalers,
            schema,
            jitter: Box::new(ThreadJitter),
            metrics,
        }
    }

    /// Build a service from already-resolved parts (used by tests and
    /// embedders that manage artifacts themselves)
    pub fn from_parts(
        model: ModelArtifact,
        scalers: ScalerAdapter,
        schema: FeatureSchema,
        jitter: Box<dyn JitterSource>,
    ) -> Self {
        let state = if model.is_loaded() {
            ServiceState::Ready
        } else {
            ServiceState::ReadyFallback
        };
        Self {
            state,
            model,
            scalers,
            schema,
            jitter,
            metrics: PredictorMetrics::new(),
        }
    }

    /// Replace the randomness source (seedable for deterministic tests)
    pub fn with_jitter(mut self, jitter: Box<dyn JitterSource>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn state(&self) -> ServiceState {
        self.state
    }

    /// Run the full inference pipeline for one request
    pub fn predict(&self, request: &Value) -> PredictionResponse {
        let started = Instant::now();
        let response = self.predict_inner(request);
        self.metrics
            .observe_prediction_latency(started.elapsed().as_secs_f64());
        if response.success {
            self.metrics.inc_predictions();
            if response.result.as_ref().is_some_and(|r| r.fallback_mode) {
                self.metrics.inc_fallback_predictions();
            }
        } else {
            self.metrics.inc_prediction_failures();
        }
        response
    }

    fn predict_inner(&self, request: &Value) -> PredictionResponse {
        if self.state == ServiceState::Failed {
            return PredictionResponse::failure("predictor service failed to initialize");
        }

        let Some(data) = request.as_object() else {
            return PredictionResponse::failure(PredictError::Validation);
        };

        let features = match build_features(data, Utc::now()) {
            Ok(features) => features,
            Err(e) => return PredictionResponse::failure(e),
        };
        let vector = assemble(&features, &self.schema);

        let (raw, fallback_mode, path) = self.run_model(&features, &vector);

        // The heuristic already speaks physical kWh; only trained output
        // passes through the inverse transform
        let value = if fallback_mode {
            raw
        } else {
            self.scalers.inverse(raw)
        };
        let prediction = value.max(0.0);

        let confidence = path.score(self.jitter.as_ref());
        let descriptor = if fallback_mode {
            FALLBACK_DESCRIPTOR.to_string()
        } else {
            self.model.descriptor()
        };

        PredictionResponse::ok(Prediction {
            prediction: round_to(prediction, 2),
            confidence: round_to(confidence, 1),
            unit: "kWh".to_string(),
            model_descriptor: descriptor,
            features_used: features.len(),
            timestamp: Utc::now().to_rfc3339(),
            quality: quality_label(confidence),
            fallback_mode,
        })
    }

    /// Produce the raw scalar from the resolved model variant
    ///
    /// Invocation failures are recovered here via the heuristic; they never
    /// propagate to the caller.
    fn run_model(
        &self,
        features: &crate::features::FeatureSet,
        vector: &[f64],
    ) -> (f64, bool, ConfidencePath) {
        match &self.model {
            ModelArtifact::Linear(est) | ModelArtifact::Wrapped(est) => {
                let scaled = self.scalers.forward(vector);
                match est.predict(&scaled) {
                    Ok(raw) => (
                        raw,
                        false,
                        ConfidencePath::KnownModel {
                            accuracy: est.accuracy,
                        },
                    ),
                    Err(e) => {
                        warn!(error = %e, "estimator invocation failed, using heuristic");
                        (
                            heuristic_estimate(features, self.jitter.as_ref()),
                            true,
                            ConfidencePath::Fallback,
                        )
                    }
                }
            }
            ModelArtifact::Graph(graph) => {
                let scaled = self.scalers.forward(vector);
                match graph.run(&scaled) {
                    Ok(raw) => (raw, false, ConfidencePath::TrainedModel),
                    Err(e) => {
                        warn!(error = %e, "graph invocation failed, using heuristic");
                        (
                            heuristic_estimate(features, self.jitter.as_ref()),
                            true,
                            ConfidencePath::Fallback,
                        )
                    }
                }
            }
            ModelArtifact::Unavailable => (
                heuristic_estimate(features, self.jitter.as_ref()),
                true,
                ConfidencePath::Fallback,
            ),
        }
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            status: if self.state == ServiceState::Failed {
                ServiceHealth::Unhealthy
            } else {
                ServiceHealth::Healthy
            },
            model_loaded: self.model.is_loaded(),
            timestamp: Utc::now().to_rfc3339(),
        }
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo {
            model_loaded: self.model.is_loaded(),
            model_descriptor: self.model.descriptor(),
            feature_columns: self.schema.columns().to_vec(),
            num_features: self.schema.len(),
            scalers_available: ScalersAvailable {
                x: self.scalers.has_x(),
                y: self.scalers.has_y(),
            },
        }
    }
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}
