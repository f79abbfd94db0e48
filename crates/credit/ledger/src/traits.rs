use crate::error::LedgerError;
use crate::model::{AuditAppend, AuditEvent, AuditEventList, QueryWindow};

/// Write boundary for audit appends.
pub trait AuditWriter: Send + Sync {
    /// Assign id and timestamp, persist, and return the stored event.
    ///
    /// Appends are not idempotent: the same input twice produces two events.
    fn append(&self, entry: AuditAppend) -> Result<AuditEvent, LedgerError>;
}

/// Read boundary for audit history.
pub trait AuditReader: Send + Sync {
    /// Page through events newest-first.
    fn query(&self, window: QueryWindow) -> Result<AuditEventList, LedgerError>;

    /// Number of stored events.
    fn total(&self) -> Result<u64, LedgerError>;

    /// Walk the full history and report the first integrity violation.
    fn validate(&self) -> Result<(), LedgerError>;
}

/// Unified ledger trait.
pub trait AuditLedger: AuditWriter + AuditReader {}

impl<T> AuditLedger for T where T: AuditWriter + AuditReader {}
