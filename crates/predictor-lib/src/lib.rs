//! Energy consumption prediction library
//!
//! This crate provides the core inference pipeline:
//! - Feature construction from sparse contextual requests
//! - Schema-ordered feature vector assembly
//! - Optional forward/inverse rescaling with graceful degradation
//! - Model artifact loading and dispatch, with a heuristic fallback
//! - Bounded confidence scoring
//! - Metrics for the serving layer

pub mod confidence;
pub mod error;
pub mod features;
pub mod model;
pub mod observability;
pub mod responses;
pub mod scaler;
pub mod schema;
pub mod service;

pub use confidence::{JitterSource, Quality, SeededJitter, ThreadJitter};
pub use error::PredictError;
pub use features::{build_features, FeatureSet, NUM_FEATURES};
pub use model::{heuristic_estimate, LinearEstimator, ModelArtifact, FALLBACK_DESCRIPTOR};
pub use observability::PredictorMetrics;
pub use responses::{
    HealthStatus, ModelInfo, Prediction, PredictionResponse, ScalersAvailable, ServiceHealth,
};
pub use scaler::{RobustScalerParams, ScalerAdapter};
pub use schema::{assemble, FeatureSchema, DEFAULT_FEATURE_COLUMNS};
pub use service::{PredictorService, ServiceState};
