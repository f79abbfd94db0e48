//! Credit Service - decisioning entry points
//!
//! Wires the scoring backend, fairness engine and audit ledger into the
//! operations callers use:
//! - score an applicant (optionally with an explanation)
//! - compute a fairness report over labelled rows
//! - page through audit history
//! - publish the active model card
//!
//! Audit writes never fail a request. A failed append is parked in the
//! [`AuditSink`] outbox, reported on the fault channel, and retried when the
//! host calls [`DecisionService::retry_pending_audits`].

#![deny(unsafe_code)]

pub mod audit;
pub mod backend;
pub mod config;
mod error;
mod service;
pub mod telemetry;

pub use audit::{AuditSink, AuditStatus, LedgerFault, RetryReport};
pub use backend::{BackendOutcome, DemoBackend, LocalBackend, ScoringBackend};
pub use config::{
    AuditConfig, BackendKind, LedgerConfig, LoggingConfig, ModelConfig, ServiceConfig,
};
pub use error::{ConfigError, ServiceError, ServiceResult};
pub use service::{DecisionService, FairnessResponse, ScoreResponse};
pub use telemetry::init_tracing;
