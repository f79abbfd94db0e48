//! Additive explanations and adverse-action reason codes.

use credit_types::{ApplicantFeatures, ExplainResult, Feature, FeatureContribution, RequestId};
use tracing::debug;

use crate::error::{ExplainError, ScoringError};
use crate::model::sigmoid;
use crate::normalize::FeatureNormalizer;
use crate::weights::WeightTable;

/// Prefix shared by every reason code.
pub const REASON_CODE_PREFIX: &str = "HIGH_RISK_SIGNAL:";

/// Tolerance for `base_value + Σ contribution == raw`.
pub const CONTRIBUTION_TOLERANCE: f64 = 1e-6;

/// Reason-code selection knobs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExplainPolicy {
    /// Maximum number of reason codes.
    pub top_k: usize,
    /// Minimum |contribution| (in raw-score units) for a reason code.
    pub materiality: f64,
}

impl Default for ExplainPolicy {
    fn default() -> Self {
        Self {
            top_k: 3,
            materiality: 0.10,
        }
    }
}

/// Decomposes a raw score into per-feature contributions.
#[derive(Clone, Debug, Default)]
pub struct ExplainabilityEngine {
    normalizer: FeatureNormalizer,
    weights: WeightTable,
    policy: ExplainPolicy,
}

impl ExplainabilityEngine {
    pub fn new(weights: WeightTable, policy: ExplainPolicy) -> Self {
        Self {
            normalizer: FeatureNormalizer::new(),
            weights,
            policy,
        }
    }

    pub fn policy(&self) -> ExplainPolicy {
        self.policy
    }

    /// Explain `raw`, the pre-sigmoid score computed for `features`.
    ///
    /// Contributions come back largest absolute driver first; equal
    /// magnitudes keep feature declaration order.
    pub fn explain(
        &self,
        request_id: &RequestId,
        features: &ApplicantFeatures,
        raw: f64,
        base_value: f64,
    ) -> Result<ExplainResult, ScoringError> {
        if base_value.to_bits() != self.weights.base_value.to_bits() {
            return Err(ExplainError::BaseValueMismatch {
                given: base_value,
                expected: self.weights.base_value,
            }
            .into());
        }

        let normalized = self.normalizer.normalize(features)?;
        let mut contributions: Vec<FeatureContribution> = normalized
            .iter()
            .map(|(feature, value)| {
                let weight = self.weights.weight(feature);
                FeatureContribution {
                    feature,
                    value: features.get(feature),
                    weight,
                    contribution: weight * value,
                }
            })
            .collect();

        let reconstructed = base_value
            + contributions
                .iter()
                .map(|c| c.contribution)
                .sum::<f64>();
        if (reconstructed - raw).abs() > CONTRIBUTION_TOLERANCE {
            return Err(ExplainError::ContributionMismatch {
                raw,
                reconstructed,
                tolerance: CONTRIBUTION_TOLERANCE,
            }
            .into());
        }

        // Stable sort: ties keep declaration order.
        contributions.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        debug!(
            request_id = %request_id,
            raw = raw,
            top_driver = %contributions[0].feature,
            "Score explained"
        );

        Ok(ExplainResult {
            request_id: request_id.clone(),
            model_version: self.weights.version.clone(),
            score: sigmoid(raw),
            base_value,
            contributions,
        })
    }

    /// Reason codes for an explanation.
    ///
    /// Takes up to `top_k` risk-increasing (negative) contributions whose
    /// magnitude exceeds the materiality threshold, largest first. Fewer
    /// qualifying drivers yield fewer codes; the list is never padded.
    pub fn reason_codes(&self, contributions: &[FeatureContribution]) -> Vec<String> {
        let mut risk: Vec<&FeatureContribution> = contributions
            .iter()
            .filter(|c| c.contribution < 0.0 && c.contribution.abs() > self.policy.materiality)
            .collect();
        risk.sort_by(|a, b| b.contribution.abs().total_cmp(&a.contribution.abs()));

        risk.into_iter()
            .take(self.policy.top_k)
            .map(|c| format!("{}{}", REASON_CODE_PREFIX, c.feature))
            .collect()
    }
}

/// Adverse-action wording for a reason code, if it names a known feature.
pub fn describe_reason_code(code: &str) -> Option<&'static str> {
    let name = code.strip_prefix(REASON_CODE_PREFIX)?;
    let feature = Feature::ALL.into_iter().find(|f| f.as_str() == name)?;
    let text = match feature {
        Feature::RentOnTimeRatio12m => {
            "Recent rent payment history shows lower on-time payment consistency."
        }
        Feature::UtilitiesOnTimeRatio12m => {
            "Recent utility payment history shows lower on-time payment consistency."
        }
        Feature::CashflowVolatility90d => {
            "Cash-flow patterns show high volatility, increasing repayment uncertainty."
        }
        Feature::IncomeStability6m => "Income indicators show limited stability over recent months.",
        Feature::AvgMonthlyNetInflow6m => {
            "Average monthly net inflow indicates limited repayment capacity."
        }
        Feature::AvgDailyBalance90d => {
            "Average account balance indicates a limited buffer for repayment shocks."
        }
        Feature::OverdraftCount12m => "Overdraft events were observed in recent history.",
        Feature::MonthsAtAddress => "Time at current address is short.",
    };
    Some(text)
}
