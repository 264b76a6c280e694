//! Observability infrastructure for the predictor
//!
//! Prometheus metrics for the inference path, registered once on the global
//! registry and exposed by the serving layer's /metrics endpoint.

use prometheus::{
    register_gauge_vec, register_histogram, register_int_counter, GaugeVec, Histogram, IntCounter,
};
use std::sync::OnceLock;

/// Default histogram buckets for latency measurements (in seconds)
const LATENCY_BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
];

/// Global metrics instance (registered once)
static GLOBAL_METRICS: OnceLock<PredictorMetricsInner> = OnceLock::new();

struct PredictorMetricsInner {
    prediction_latency_seconds: Histogram,
    predictions_total: IntCounter,
    fallback_predictions_total: IntCounter,
    prediction_failures_total: IntCounter,
    model_info: GaugeVec,
}

impl PredictorMetricsInner {
    fn new() -> Self {
        Self {
            prediction_latency_seconds: register_histogram!(
                "energy_predictor_prediction_latency_seconds",
                "Time spent building features and running inference",
                LATENCY_BUCKETS.to_vec()
            )
            .expect("Failed to register prediction_latency_seconds"),

            predictions_total: register_int_counter!(
                "energy_predictor_predictions_total",
                "Total number of successful predictions"
            )
            .expect("Failed to register predictions_total"),

            fallback_predictions_total: register_int_counter!(
                "energy_predictor_fallback_predictions_total",
                "Predictions answered by the heuristic fallback"
            )
            .expect("Failed to register fallback_predictions_total"),

            prediction_failures_total: register_int_counter!(
                "energy_predictor_prediction_failures_total",
                "Requests rejected with a failure result"
            )
            .expect("Failed to register prediction_failures_total"),

            model_info: register_gauge_vec!(
                "energy_predictor_model_info",
                "Information about the currently loaded model artifact",
                &["descriptor"]
            )
            .expect("Failed to register model_info"),
        }
    }
}

/// Lightweight handle to the global predictor metrics
///
/// Multiple clones share the same underlying metrics.
#[derive(Clone)]
pub struct PredictorMetrics {
    _private: (),
}

impl Default for PredictorMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictorMetrics {
    pub fn new() -> Self {
        GLOBAL_METRICS.get_or_init(PredictorMetricsInner::new);
        Self { _private: () }
    }

    fn inner(&self) -> &PredictorMetricsInner {
        GLOBAL_METRICS.get().expect("Metrics not initialized")
    }

    pub fn observe_prediction_latency(&self, duration_secs: f64) {
        self.inner()
            .prediction_latency_seconds
            .observe(duration_secs);
    }

    pub fn inc_predictions(&self) {
        self.inner().predictions_total.inc();
    }

    pub fn inc_fallback_predictions(&self) {
        self.inner().fallback_predictions_total.inc();
    }

    pub fn inc_prediction_failures(&self) {
        self.inner().prediction_failures_total.inc();
    }

    /// Record the loaded model descriptor
    pub fn set_model_descriptor(&self, descriptor: &str) {
        self.inner().model_info.reset();
        self.inner()
            .model_info
            .with_label_values(&[descriptor])
            .set(1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_handle() {
        // Metrics live on the global registry, so this exercises the handle
        // rather than asserting on registry contents.
        let metrics = PredictorMetrics::new();
        metrics.observe_prediction_latency(0.001);
        metrics.inc_predictions();
        metrics.inc_fallback_predictions();
        metrics.inc_prediction_failures();
        metrics.set_model_descriptor("Ridge Regression");
    }
}
