use std::sync::Arc;

use credit_fairness::FairnessMetricsEngine;
use credit_ledger::{
    ApplicantHasher, AuditAppend, AuditEventList, AuditLedger, InMemoryAuditLedger,
    JsonlAuditLedger, QueryWindow,
};
use credit_scoring::{DemoScorer, ModelCard, ScoringPipeline, WeightTable};
use credit_types::{ExplainResult, FairnessReport, FairnessRow, RequestId, ScoreRequest, ScoreResult};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::audit::{AuditSink, AuditStatus, LedgerFault, RetryReport};
use crate::backend::{DemoBackend, LocalBackend, ScoringBackend};
use crate::config::{BackendKind, LedgerConfig, ServiceConfig};
use crate::error::ServiceResult;

/// Response to a scoring call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub result: ScoreResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<ExplainResult>,
    pub audit: AuditStatus,
}

/// Response to a fairness call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FairnessResponse {
    pub request_id: RequestId,
    pub report: FairnessReport,
    pub audit: AuditStatus,
}

/// Entry point for scoring, fairness reporting and audit history.
pub struct DecisionService {
    backend: Box<dyn ScoringBackend>,
    fairness: FairnessMetricsEngine,
    ledger: Arc<dyn AuditLedger>,
    sink: AuditSink,
    hasher: ApplicantHasher,
}

impl DecisionService {
    /// Assemble a service from parts. Returns the fault channel receiver.
    pub fn new(
        backend: Box<dyn ScoringBackend>,
        ledger: Arc<dyn AuditLedger>,
        hasher: ApplicantHasher,
        max_attempts: u32,
    ) -> (Self, UnboundedReceiver<LedgerFault>) {
        let (sink, faults) = AuditSink::new(Arc::clone(&ledger), max_attempts);
        let service = Self {
            backend,
            fairness: FairnessMetricsEngine::new(),
            ledger,
            sink,
            hasher,
        };
        (service, faults)
    }

    /// Build backend and ledger from configuration.
    pub fn from_config(
        config: &ServiceConfig,
    ) -> ServiceResult<(Self, UnboundedReceiver<LedgerFault>)> {
        config.validate()?;
        let thresholds = config.model.thresholds()?;

        let backend: Box<dyn ScoringBackend> = match config.model.backend {
            BackendKind::Local => Box::new(LocalBackend::new(ScoringPipeline::new(
                WeightTable::default(),
                thresholds,
                config.model.explain_policy()?,
            ))),
            BackendKind::Demo => Box::new(DemoBackend::new(
                DemoScorer::seeded(config.model.demo_seed).with_thresholds(thresholds),
            )),
        };

        let ledger: Arc<dyn AuditLedger> = match &config.ledger {
            LedgerConfig::Memory => Arc::new(InMemoryAuditLedger::new()),
            LedgerConfig::Jsonl { path } => Arc::new(JsonlAuditLedger::open(path)?),
        };

        let hasher = ApplicantHasher::new(config.audit.applicant_hash_key.as_deref());
        info!(
            backend = backend.name(),
            ledger = ?config.ledger,
            keyed_applicant_hash = hasher.is_keyed(),
            "Decision service configured"
        );

        Ok(Self::new(backend, ledger, hasher, config.audit.max_attempts))
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.name()
    }

    /// Score one applicant and record the outcome.
    ///
    /// Validation failures return before any audit write. Audit failures do
    /// not fail the call; they show up as [`AuditStatus::Deferred`].
    pub fn score(&self, request: &ScoreRequest, explain: bool) -> ServiceResult<ScoreResponse> {
        request.validate()?;
        if let Some(context) = &request.audit_context {
            debug!(
                answered = context.answered_fields(),
                "Audit context received and discarded"
            );
        }

        let outcome = self.backend.score(request, explain)?;
        let applicant = self.hasher.reference(&request.applicant_id);
        debug!(
            request_id = %outcome.result.request_id,
            applicant = %applicant,
            decision = %outcome.result.decision,
            "Applicant scored"
        );

        let audit = self
            .sink
            .record(AuditAppend::score(&outcome.result, Some(applicant)));

        Ok(ScoreResponse {
            result: outcome.result,
            explanation: outcome.explanation,
            audit,
        })
    }

    /// Compute parity statistics for a batch and record the headline numbers.
    pub fn fairness_report(
        &self,
        rows: &[FairnessRow],
        positive_label: Option<u8>,
    ) -> ServiceResult<FairnessResponse> {
        let report = self
            .fairness
            .evaluate_with_label(rows, positive_label.unwrap_or(1))?;
        let request_id = RequestId::generate();
        let audit = self
            .sink
            .record(AuditAppend::fairness_report(request_id.clone(), &report));

        Ok(FairnessResponse {
            request_id,
            report,
            audit,
        })
    }

    /// Page through audit history, newest first.
    pub fn audit_events(&self, limit: i64, offset: i64) -> ServiceResult<AuditEventList> {
        let window = QueryWindow::try_new(limit, offset)?;
        Ok(self.ledger.query(window)?)
    }

    pub fn model_card(&self) -> Option<ModelCard> {
        self.backend.model_card()
    }

    pub fn retry_pending_audits(&self) -> RetryReport {
        self.sink.retry_pending()
    }

    pub fn audit_sink(&self) -> &AuditSink {
        &self.sink
    }
}
