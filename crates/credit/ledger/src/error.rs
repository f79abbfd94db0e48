use thiserror::Error;

use crate::model::AuditEventType;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Errors returned by audit ledger backends.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("{0} lock poisoned")]
    LockPoisoned(&'static str),

    #[error("payload kind {payload} does not match event type {event_type}")]
    PayloadMismatch {
        event_type: AuditEventType,
        payload: AuditEventType,
    },

    #[error("corrupt ledger line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("ledger halted: {0}")]
    Halted(String),

    #[error("ledger integrity violation at id {id}: {reason}")]
    Integrity { id: u64, reason: String },
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}
