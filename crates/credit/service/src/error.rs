use credit_fairness::FairnessError;
use credit_ledger::LedgerError;
use credit_scoring::ScoringError;
use credit_types::ValidationError;
use thiserror::Error;

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors surfaced to callers of the decision service.
///
/// Audit write failures are deliberately absent: they are reported on the
/// fault channel instead of failing the request.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("insufficient data: {0}")]
    InsufficientData(String),

    #[error("scoring error: {0}")]
    Scoring(ScoringError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl From<ScoringError> for ServiceError {
    fn from(err: ScoringError) -> Self {
        match err {
            ScoringError::Validation(err) => ServiceError::Validation(err),
            other => ServiceError::Scoring(other),
        }
    }
}

impl From<FairnessError> for ServiceError {
    fn from(err: FairnessError) -> Self {
        match err {
            FairnessError::Validation(err) => ServiceError::Validation(err),
            other @ FairnessError::InsufficientData => {
                ServiceError::InsufficientData(other.to_string())
            }
        }
    }
}

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("tracing init failed: {0}")]
    Telemetry(String),
}
