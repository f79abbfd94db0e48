use credit_types::ValidationError;
use thiserror::Error;

/// Failures of the explanation step.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExplainError {
    /// `base_value + Σ contribution` drifted from the raw score it explains.
    #[error("contributions sum to {reconstructed} but raw score is {raw} (tolerance {tolerance})")]
    ContributionMismatch {
        raw: f64,
        reconstructed: f64,
        tolerance: f64,
    },

    #[error("base value {given} does not match model intercept {expected}")]
    BaseValueMismatch { given: f64, expected: f64 },
}

/// Errors surfaced by the scoring crate.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ScoringError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Explain(#[from] ExplainError),

    #[error("invalid decision thresholds: approve={approve}, review={review} (need 0 <= review < approve <= 1)")]
    InvalidThresholds { approve: f64, review: f64 },
}
