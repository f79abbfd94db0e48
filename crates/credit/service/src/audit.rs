//! Audit sink: ledger appends that never fail the caller
//!
//! A failed append is parked in an in-process outbox and reported on an
//! unbounded fault channel. [`AuditSink::retry_pending`] drains the outbox on
//! the host's schedule; once an entry has failed `max_attempts` times it is
//! escalated and moved to the dead-letter list, where it stays until the host
//! takes it.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use credit_ledger::{AuditAppend, AuditEventType, AuditLedger};
use credit_types::RequestId;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};

/// Outcome of the audit write attached to a response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AuditStatus {
    Recorded { event_id: u64 },
    /// Parked in the outbox after a failed append.
    Deferred { attempts: u32 },
}

/// Report of one failed append attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerFault {
    pub request_id: RequestId,
    pub event_type: AuditEventType,
    pub attempts: u32,
    pub error: String,
    /// Retries are exhausted; an operator has to act.
    pub escalated: bool,
}

/// Result of draining the outbox once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RetryReport {
    pub recorded: usize,
    pub still_pending: usize,
    pub escalated: usize,
}

#[derive(Debug)]
struct PendingAppend {
    entry: AuditAppend,
    attempts: u32,
}

#[derive(Debug, Default)]
struct Outbox {
    pending: VecDeque<PendingAppend>,
    dead_letters: Vec<AuditAppend>,
}

pub struct AuditSink {
    ledger: Arc<dyn AuditLedger>,
    outbox: Mutex<Outbox>,
    faults: UnboundedSender<LedgerFault>,
    max_attempts: u32,
}

impl AuditSink {
    /// Create a sink and the receiving end of its fault channel.
    pub fn new(
        ledger: Arc<dyn AuditLedger>,
        max_attempts: u32,
    ) -> (Self, UnboundedReceiver<LedgerFault>) {
        let (faults, receiver) = unbounded_channel();
        let sink = Self {
            ledger,
            outbox: Mutex::new(Outbox::default()),
            faults,
            max_attempts: max_attempts.max(1),
        };
        (sink, receiver)
    }

    /// Attempt one append. Failure is reported, never returned.
    pub fn record(&self, entry: AuditAppend) -> AuditStatus {
        match self.ledger.append(entry.clone()) {
            Ok(event) => AuditStatus::Recorded { event_id: event.id },
            Err(err) => {
                let pending = PendingAppend { entry, attempts: 1 };
                self.park(pending, err.to_string())
            }
        }
    }

    /// Retry every pending append once, in arrival order.
    pub fn retry_pending(&self) -> RetryReport {
        let batch: Vec<PendingAppend> = self.outbox().pending.drain(..).collect();
        let mut report = RetryReport::default();

        for mut pending in batch {
            match self.ledger.append(pending.entry.clone()) {
                Ok(event) => {
                    info!(
                        id = event.id,
                        request_id = %event.request_id,
                        attempts = pending.attempts + 1,
                        "Deferred audit event recorded"
                    );
                    report.recorded += 1;
                }
                Err(err) => {
                    pending.attempts += 1;
                    match self.park(pending, err.to_string()) {
                        AuditStatus::Deferred { attempts } if attempts >= self.max_attempts => {
                            report.escalated += 1
                        }
                        _ => report.still_pending += 1,
                    }
                }
            }
        }

        report
    }

    pub fn pending(&self) -> usize {
        self.outbox().pending.len()
    }

    /// Take escalated entries for manual handling.
    pub fn take_dead_letters(&self) -> Vec<AuditAppend> {
        std::mem::take(&mut self.outbox().dead_letters)
    }

    fn park(&self, pending: PendingAppend, error: String) -> AuditStatus {
        let attempts = pending.attempts;
        let escalated = attempts >= self.max_attempts;
        let fault = LedgerFault {
            request_id: pending.entry.request_id.clone(),
            event_type: pending.entry.event_type,
            attempts,
            error,
            escalated,
        };

        if escalated {
            error!(
                request_id = %fault.request_id,
                event_type = %fault.event_type,
                attempts,
                error = %fault.error,
                escalated = true,
                "Audit append failed permanently"
            );
            self.outbox().dead_letters.push(pending.entry);
        } else {
            warn!(
                request_id = %fault.request_id,
                event_type = %fault.event_type,
                attempts,
                error = %fault.error,
                "Audit append deferred"
            );
            self.outbox().pending.push_back(pending);
        }

        if self.faults.send(fault).is_err() {
            warn!("Ledger fault receiver dropped");
        }
        AuditStatus::Deferred { attempts }
    }

    fn outbox(&self) -> MutexGuard<'_, Outbox> {
        self.outbox
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
