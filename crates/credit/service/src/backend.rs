//! Scoring backend strategies
//!
//! The backend is picked once, when the service is built. Nothing switches
//! it at runtime.

use credit_scoring::{DemoScorer, ModelCard, ScoringError, ScoringPipeline};
use credit_types::{ExplainResult, ScoreRequest, ScoreResult};

/// What a backend returns for one request.
#[derive(Clone, Debug, PartialEq)]
pub struct BackendOutcome {
    pub result: ScoreResult,
    /// Present when requested and the backend can decompose its score.
    pub explanation: Option<ExplainResult>,
}

/// Strategy producing score results for validated requests.
pub trait ScoringBackend: Send + Sync {
    fn name(&self) -> &'static str;

    fn score(&self, request: &ScoreRequest, explain: bool)
        -> Result<BackendOutcome, ScoringError>;

    /// Card for the model behind this backend, if it has one.
    fn model_card(&self) -> Option<ModelCard>;
}

/// In-process fixed-weight model.
#[derive(Clone, Debug, Default)]
pub struct LocalBackend {
    pipeline: ScoringPipeline,
}

impl LocalBackend {
    pub fn new(pipeline: ScoringPipeline) -> Self {
        Self { pipeline }
    }
}

impl ScoringBackend for LocalBackend {
    fn name(&self) -> &'static str {
        "local"
    }

    fn score(
        &self,
        request: &ScoreRequest,
        explain: bool,
    ) -> Result<BackendOutcome, ScoringError> {
        let scored = self.pipeline.evaluate(request)?;
        Ok(BackendOutcome {
            result: scored.result,
            explanation: explain.then_some(scored.explanation),
        })
    }

    fn model_card(&self) -> Option<ModelCard> {
        Some(self.pipeline.model().card())
    }
}

/// Seeded pseudo-random scores for demos. Never explains, never has a card.
pub struct DemoBackend {
    scorer: DemoScorer,
}

impl DemoBackend {
    pub fn new(scorer: DemoScorer) -> Self {
        Self { scorer }
    }

    pub fn seeded(seed: u64) -> Self {
        Self::new(DemoScorer::seeded(seed))
    }
}

impl ScoringBackend for DemoBackend {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn score(
        &self,
        request: &ScoreRequest,
        _explain: bool,
    ) -> Result<BackendOutcome, ScoringError> {
        Ok(BackendOutcome {
            result: self.scorer.score(request)?,
            explanation: None,
        })
    }

    fn model_card(&self) -> Option<ModelCard> {
        None
    }
}
