use credit_types::ValidationError;
use thiserror::Error;

/// Fairness evaluation errors
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FairnessError {
    #[error("Insufficient data: fairness report needs at least one row")]
    InsufficientData,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
