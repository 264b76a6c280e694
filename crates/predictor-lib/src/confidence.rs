//! Confidence scoring for prediction results
//!
//! Each inference path carries its own base confidence and clamp range; a
//! small Gaussian jitter keeps the score from being a constant. All
//! randomness flows through an injectable source so tests can pin it down.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::sync::Mutex;

/// Confidence above this threshold is labeled High
pub const HIGH_QUALITY_THRESHOLD: f64 = 90.0;

/// Source of the random draws used by confidence jitter and the heuristic
pub trait JitterSource: Send + Sync {
    /// Sample a zero-mean Gaussian with the given standard deviation
    fn gaussian(&self, std_dev: f64) -> f64;

    /// Sample uniformly from the inclusive range [low, high]
    fn uniform(&self, low: f64, high: f64) -> f64;
}

/// Default source backed by the thread-local generator
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadJitter;

impl JitterSource for ThreadJitter {
    fn gaussian(&self, std_dev: f64) -> f64 {
        Normal::new(0.0, std_dev)
            .map(|dist| dist.sample(&mut rand::thread_rng()))
            .unwrap_or(0.0)
    }

    fn uniform(&self, low: f64, high: f64) -> f64 {
        rand::thread_rng().gen_range(low..=high)
    }
}

/// Seedable source for deterministic tests
#[derive(Debug)]
pub struct SeededJitter {
    rng: Mutex<StdRng>,
}

impl SeededJitter {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }
}

impl JitterSource for SeededJitter {
    fn gaussian(&self, std_dev: f64) -> f64 {
        Normal::new(0.0, std_dev)
            .map(|dist| self.with_rng(|rng| dist.sample(rng)))
            .unwrap_or(0.0)
    }

    fn uniform(&self, low: f64, high: f64) -> f64 {
        self.with_rng(|rng| rng.gen_range(low..=high))
    }
}

/// Which inference path produced the prediction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfidencePath {
    /// A known, well-validated estimator whose artifact carries its accuracy
    KnownModel { accuracy: f64 },
    /// A trained model without validated accuracy metadata
    TrainedModel,
    /// The closed-form fallback heuristic
    Fallback,
}

struct Band {
    base: f64,
    std_dev: f64,
    min: f64,
    max: f64,
}

impl ConfidencePath {
    fn band(&self) -> Band {
        match self {
            ConfidencePath::KnownModel { accuracy } => Band {
                base: *accuracy,
                std_dev: 2.0,
                min: 85.0,
                max: 99.0,
            },
            ConfidencePath::TrainedModel => Band {
                base: 85.0,
                std_dev: 5.0,
                min: 70.0,
                max: 95.0,
            },
            ConfidencePath::Fallback => Band {
                base: 75.0,
                std_dev: 5.0,
                min: 55.0,
                max: 85.0,
            },
        }
    }

    /// Jittered confidence score, clamped to the path's range
    pub fn score(&self, jitter: &dyn JitterSource) -> f64 {
        let band = self.band();
        (band.base + jitter.gaussian(band.std_dev)).clamp(band.min, band.max)
    }
}

/// Qualitative prediction quality label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    High,
    Medium,
}

pub fn quality_label(confidence: f64) -> Quality {
    if confidence > HIGH_QUALITY_THRESHOLD {
        Quality::High
    } else {
        Quality::Medium
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::FixedJitter;
    use super::*;

    #[test]
    fn test_known_model_band() {
        let path = ConfidencePath::KnownModel { accuracy: 98.4 };
        assert_eq!(path.score(&FixedJitter::zero()), 98.4);
        // Large positive jitter clamps at the band ceiling
        let high = FixedJitter {
            gaussian: 50.0,
            uniform: 1.0,
        };
        assert_eq!(path.score(&high), 99.0);
        let low = FixedJitter {
            gaussian: -50.0,
            uniform: 1.0,
        };
        assert_eq!(path.score(&low), 85.0);
    }

    #[test]
    fn test_trained_model_band() {
        let path = ConfidencePath::TrainedModel;
        assert_eq!(path.score(&FixedJitter::zero()), 85.0);
        let low = FixedJitter {
            gaussian: -100.0,
            uniform: 1.0,
        };
        assert_eq!(path.score(&low), 70.0);
    }

    #[test]
    fn test_fallback_band_is_lowest() {
        let path = ConfidencePath::Fallback;
        assert_eq!(path.score(&FixedJitter::zero()), 75.0);
        let low = FixedJitter {
            gaussian: -100.0,
            uniform: 1.0,
        };
        assert_eq!(path.score(&low), 55.0);
        let high = FixedJitter {
            gaussian: 100.0,
            uniform: 1.0,
        };
        assert_eq!(path.score(&high), 85.0);
    }

    #[test]
    fn test_seeded_jitter_is_reproducible() {
        let a = SeededJitter::from_seed(7);
        let b = SeededJitter::from_seed(7);
        for _ in 0..10 {
            assert_eq!(a.gaussian(2.0), b.gaussian(2.0));
            assert_eq!(a.uniform(0.85, 1.15), b.uniform(0.85, 1.15));
        }
    }

    #[test]
    fn test_thread_jitter_stays_in_uniform_range() {
        let jitter = ThreadJitter;
        for _ in 0..100 {
            let v = jitter.uniform(0.85, 1.15);
            assert!((0.85..=1.15).contains(&v));
        }
    }

    #[test]
    fn test_quality_threshold() {
        assert_eq!(quality_label(95.0), Quality::High);
        assert_eq!(quality_label(90.0), Quality::Medium);
        assert_eq!(quality_label(70.0), Quality::Medium);
    }
}
