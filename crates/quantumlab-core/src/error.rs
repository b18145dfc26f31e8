//! Error taxonomy for the simulation core.
//!
//! Every variant is a configuration error surfaced synchronously by the call
//! that detected it. Nothing here is transient and nothing is retried.
//! Two conditions that look like errors are not variants:
//! an empty path set (probability 0) and a frequency requested before any
//! trial was recorded (`None`).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("probability {value} outside [0, 1]")]
    InvalidProbability { value: f64 },

    #[error("outcome weights sum to {sum}, expected 1 within 1e-9")]
    WeightsNotNormalized { sum: f64 },

    #[error("weighted outcome set is empty")]
    EmptyWeights,

    #[error("amplitude scale {value} outside (0, 1]")]
    InvalidAmplitudeScale { value: f64 },

    #[error("junction amplitudes are not unitary: sum of squares is {sum}")]
    NonUnitaryJunction { sum: f64 },

    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LabError>;

/// Validate that `value` is a probability, without clamping.
pub fn check_probability(value: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(LabError::InvalidProbability { value })
    }
}
