use chrono::Utc;

use crate::error::LedgerError;
use crate::model::{AuditAppend, AuditEvent, AuditEventList, QueryWindow};

/// Ordered event history shared by every backend.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    events: Vec<AuditEvent>,
}

impl LedgerState {
    /// Adopt a loaded history after checking it.
    pub(crate) fn from_history(events: Vec<AuditEvent>) -> Result<Self, LedgerError> {
        validate_history(&events)?;
        Ok(Self { events })
    }

    pub(crate) fn len(&self) -> usize {
        self.events.len()
    }

    /// Stamp the next event without storing it. Callers persist first and then
    /// [`commit`](Self::commit) while still holding the write lock.
    pub(crate) fn prepare(&self, entry: AuditAppend) -> Result<AuditEvent, LedgerError> {
        let payload_kind = entry.payload.kind();
        if payload_kind != entry.event_type {
            return Err(LedgerError::PayloadMismatch {
                event_type: entry.event_type,
                payload: payload_kind,
            });
        }

        let (id, ts) = match self.events.last() {
            Some(last) => (last.id + 1, Utc::now().max(last.ts)),
            None => (1, Utc::now()),
        };

        Ok(AuditEvent {
            id,
            ts,
            request_id: entry.request_id,
            event_type: entry.event_type,
            model_version: entry.model_version,
            applicant_id: entry.applicant_id,
            payload: entry.payload,
        })
    }

    pub(crate) fn commit(&mut self, event: AuditEvent) {
        self.events.push(event);
    }

    pub(crate) fn page(&self, window: QueryWindow) -> AuditEventList {
        AuditEventList {
            total: self.events.len() as u64,
            limit: window.limit(),
            offset: window.offset(),
            events: window.apply(self.events.iter().rev().cloned()),
        }
    }

    pub(crate) fn validate(&self) -> Result<(), LedgerError> {
        validate_history(&self.events)
    }
}

/// Check id continuity, timestamp order and payload kinds of a history.
pub(crate) fn validate_history(events: &[AuditEvent]) -> Result<(), LedgerError> {
    for (index, event) in events.iter().enumerate() {
        let expected = index as u64 + 1;
        if event.id != expected {
            let reason = if event.id < expected {
                format!("duplicate or reordered id, expected {expected}")
            } else {
                format!("gap in id sequence, expected {expected}")
            };
            return Err(LedgerError::Integrity {
                id: event.id,
                reason,
            });
        }

        if index > 0 && event.ts < events[index - 1].ts {
            return Err(LedgerError::Integrity {
                id: event.id,
                reason: "timestamp earlier than previous event".into(),
            });
        }

        if event.payload.kind() != event.event_type {
            return Err(LedgerError::Integrity {
                id: event.id,
                reason: format!(
                    "payload kind {} stored under event type {}",
                    event.payload.kind(),
                    event.event_type
                ),
            });
        }
    }
    Ok(())
}
