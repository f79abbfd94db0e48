use credit_types::{ExplainResult, RequestId, ScoreRequest, ScoreResult};

use crate::error::ScoringError;
use crate::explain::{ExplainPolicy, ExplainabilityEngine};
use crate::model::{DecisionThresholds, ScoringModel};
use crate::weights::WeightTable;

/// Result of running one request through the pipeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredApplication {
    pub result: ScoreResult,
    pub explanation: ExplainResult,
    /// Pre-sigmoid score the explanation decomposes.
    pub raw: f64,
}

/// Normalizer → model → explanation, for one weight table.
#[derive(Clone, Debug, Default)]
pub struct ScoringPipeline {
    model: ScoringModel,
    explainer: ExplainabilityEngine,
}

impl ScoringPipeline {
    pub fn new(weights: WeightTable, thresholds: DecisionThresholds, policy: ExplainPolicy) -> Self {
        Self {
            model: ScoringModel::new(weights.clone(), thresholds),
            explainer: ExplainabilityEngine::new(weights, policy),
        }
    }

    pub fn model(&self) -> &ScoringModel {
        &self.model
    }

    pub fn explainer(&self) -> &ExplainabilityEngine {
        &self.explainer
    }

    /// Score a request. Every call gets a fresh request id.
    ///
    /// Features are validated on the way in; the applicant token is the
    /// caller's responsibility.
    pub fn evaluate(&self, request: &ScoreRequest) -> Result<ScoredApplication, ScoringError> {
        let scored = self.model.score(&request.features)?;
        let request_id = RequestId::generate();
        let explanation = self.explainer.explain(
            &request_id,
            &request.features,
            scored.raw,
            self.model.base_value(),
        )?;
        let reason_codes = self.explainer.reason_codes(&explanation.contributions);

        Ok(ScoredApplication {
            result: ScoreResult {
                request_id,
                model_version: self.model.version().clone(),
                score: scored.score,
                decision: scored.decision,
                reason_codes,
            },
            explanation,
            raw: scored.raw,
        })
    }
}
