use std::sync::RwLock;

use tracing::info;

use crate::error::LedgerError;
use crate::model::{AuditAppend, AuditEvent, AuditEventList, QueryWindow};
use crate::state::LedgerState;
use crate::traits::{AuditReader, AuditWriter};

/// In-memory audit ledger used for tests, local demos, and embedding.
#[derive(Debug, Default)]
pub struct InMemoryAuditLedger {
    inner: RwLock<LedgerState>,
}

impl InMemoryAuditLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AuditWriter for InMemoryAuditLedger {
    fn append(&self, entry: AuditAppend) -> Result<AuditEvent, LedgerError> {
        let mut state = self
            .inner
            .write()
            .map_err(|_| LedgerError::LockPoisoned("audit ledger"))?;
        let event = state.prepare(entry)?;
        state.commit(event.clone());

        info!(
            id = event.id,
            event_type = %event.event_type,
            request_id = %event.request_id,
            "Audit event appended"
        );
        Ok(event)
    }
}

impl AuditReader for InMemoryAuditLedger {
    fn query(&self, window: QueryWindow) -> Result<AuditEventList, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("audit ledger"))?;
        Ok(state.page(window))
    }

    fn total(&self) -> Result<u64, LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("audit ledger"))?;
        Ok(state.len() as u64)
    }

    fn validate(&self) -> Result<(), LedgerError> {
        let state = self
            .inner
            .read()
            .map_err(|_| LedgerError::LockPoisoned("audit ledger"))?;
        state.validate()
    }
}
