//! Error types for comentaram-evidence.

use thiserror::Error;

/// Result type for parameter validation.
pub type Result<T> = std::result::Result<T, ParamsError>;

/// Rejected evidence tuning.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamsError {
    /// Growth clamp range is empty or inverted.
    #[error("growth range is empty: [{min}, {max}]")]
    GrowthRange { min: f64, max: f64 },

    /// Exit threshold is stricter than the entry threshold.
    #[error("{state} band inverted: enter at {enter}, exit at {exit}")]
    Band {
        state: &'static str,
        enter: f64,
        exit: f64,
    },

    /// Cool and hot bands overlap.
    #[error("cool exit {cool_out} must sit below hot exit {hot_out}")]
    OverlappingBands { cool_out: f64, hot_out: f64 },

    /// A rate or level outside (0, 1].
    #[error("{name} out of range: {value}")]
    Rate { name: &'static str, value: f64 },

    /// Score weights are negative or do not sum to 1.
    #[error("score weights must be non-negative and sum to 1 (growth {growth}, energy {energy})")]
    Weights { growth: f64, energy: f64 },

    /// Shock threshold is unreachable by a sine wave.
    #[error("shock threshold {0} outside [-1, 1]")]
    ShockThreshold(f64),
}
