//! Credit Ledger - append-only audit history
//!
//! Every scoring and fairness call leaves exactly one [`AuditEvent`]. Events
//! get a strictly increasing id and a non-decreasing UTC timestamp inside the
//! same critical section as the write, and are never mutated afterwards.
//!
//! Payloads are a typed allowlist ([`AuditPayload`]): features, audit
//! context and raw applicant identifiers cannot be represented in an event.
//!
//! Two backends ship here:
//! - [`InMemoryAuditLedger`] for tests, demos and embedding
//! - [`JsonlAuditLedger`] which persists one JSON object per line and
//!   reloads its history on open

#![deny(unsafe_code)]

mod applicant;
mod error;
mod jsonl;
mod memory;
mod model;
mod state;
mod traits;

pub use applicant::{ApplicantHasher, ApplicantRef};
pub use error::{LedgerError, LedgerResult};
pub use jsonl::JsonlAuditLedger;
pub use memory::InMemoryAuditLedger;
pub use model::{
    AuditAppend, AuditEvent, AuditEventList, AuditEventType, AuditPayload, FairnessPayload,
    QueryWindow, ScorePayload, DEFAULT_LIMIT, MAX_LIMIT,
};
pub use traits::{AuditLedger, AuditReader, AuditWriter};
