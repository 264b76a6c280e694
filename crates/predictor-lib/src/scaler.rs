//! Forward and inverse rescaling around the trained model
//!
//! Wraps the optional persisted RobustScaler-style parameters. Absence of
//! either transform, or parameters that do not fit the assembled vector,
//! degrade to an identity passthrough with a warning; scaling problems never
//! reach the caller.

use serde::{Deserialize, Serialize};
use tracing::warn;

/// Center/scale parameters in the shape sklearn's RobustScaler persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobustScalerParams {
    pub center: Vec<f64>,
    pub scale: Vec<f64>,
}

impl RobustScalerParams {
    /// Scale entry with a floor against degenerate zero spreads
    fn scale_at(&self, index: usize) -> f64 {
        let s = self.scale.get(index).copied().unwrap_or(1.0);
        if s.abs() < f64::EPSILON {
            1.0
        } else {
            s
        }
    }

    fn fits(&self, len: usize) -> bool {
        self.center.len() == len && self.scale.len() == len
    }
}

/// Optional forward (X) and inverse (y) transforms
#[derive(Debug, Default)]
pub struct ScalerAdapter {
    x: Option<RobustScalerParams>,
    y: Option<RobustScalerParams>,
}

impl ScalerAdapter {
    pub fn new(x: Option<RobustScalerParams>, y: Option<RobustScalerParams>) -> Self {
        Self { x, y }
    }

    pub fn has_x(&self) -> bool {
        self.x.is_some()
    }

    pub fn has_y(&self) -> bool {
        self.y.is_some()
    }

    /// Transform the assembled vector into the model's normalized space
    ///
    /// Returns the vector untouched when no forward scaler is loaded or when
    /// its parameters do not match the vector length.
    pub fn forward(&self, vector: &[f64]) -> Vec<f64> {
        let Some(params) = &self.x else {
            return vector.to_vec();
        };
        if !params.fits(vector.len()) {
            warn!(
                expected = params.center.len(),
                got = vector.len(),
                "input scaler does not fit the feature vector, using raw features"
            );
            return vector.to_vec();
        }
        vector
            .iter()
            .enumerate()
            .map(|(i, v)| (v - params.center[i]) / params.scale_at(i))
            .collect()
    }

    /// Map a normalized prediction back to physical units
    pub fn inverse(&self, value: f64) -> f64 {
        let Some(params) = &self.y else {
            return value;
        };
        if params.center.is_empty() || params.scale.is_empty() {
            warn!("output scaler has empty parameters, using raw prediction");
            return value;
        }
        value * params.scale_at(0) + params.center[0]
    }
}
