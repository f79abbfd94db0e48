//! The scoring model: bounded score and two-threshold decision.

use credit_types::{ApplicantFeatures, Decision, Feature, ModelVersion, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoringError;
use crate::normalize::{FeatureNormalizer, NormalizedFeatures};
use crate::weights::WeightTable;

/// Numerically stable logistic function.
pub fn sigmoid(raw: f64) -> f64 {
    if raw >= 0.0 {
        1.0 / (1.0 + (-raw).exp())
    } else {
        let e = raw.exp();
        e / (1.0 + e)
    }
}

/// Two fixed cut points, `approve > review`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionThresholds {
    approve: f64,
    review: f64,
}

impl DecisionThresholds {
    pub const DEFAULT_APPROVE: f64 = 0.65;
    pub const DEFAULT_REVIEW: f64 = 0.40;

    pub fn new(approve: f64, review: f64) -> Result<Self, ScoringError> {
        let ordered = approve.is_finite()
            && review.is_finite()
            && (0.0..=1.0).contains(&approve)
            && (0.0..=1.0).contains(&review)
            && review < approve;
        if !ordered {
            return Err(ScoringError::InvalidThresholds { approve, review });
        }
        Ok(Self { approve, review })
    }

    pub fn approve(&self) -> f64 {
        self.approve
    }

    pub fn review(&self) -> f64 {
        self.review
    }

    /// `score ≥ approve → APPROVE`, `review ≤ score < approve → REVIEW`, else `DECLINE`.
    pub fn classify(&self, score: f64) -> Decision {
        if score >= self.approve {
            Decision::Approve
        } else if score >= self.review {
            Decision::Review
        } else {
            Decision::Decline
        }
    }
}

impl Default for DecisionThresholds {
    fn default() -> Self {
        Self {
            approve: Self::DEFAULT_APPROVE,
            review: Self::DEFAULT_REVIEW,
        }
    }
}

/// Output of [`ScoringModel::score`].
#[derive(Clone, Debug, PartialEq)]
pub struct ModelScore {
    /// Pre-sigmoid linear score.
    pub raw: f64,
    pub score: f64,
    pub decision: Decision,
    pub normalized: NormalizedFeatures,
}

/// Fixed-weight linear scorer.
#[derive(Clone, Debug, Default)]
pub struct ScoringModel {
    normalizer: FeatureNormalizer,
    weights: WeightTable,
    thresholds: DecisionThresholds,
}

impl ScoringModel {
    pub fn new(weights: WeightTable, thresholds: DecisionThresholds) -> Self {
        Self {
            normalizer: FeatureNormalizer::new(),
            weights,
            thresholds,
        }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    pub fn thresholds(&self) -> DecisionThresholds {
        self.thresholds
    }

    pub fn version(&self) -> &ModelVersion {
        &self.weights.version
    }

    pub fn base_value(&self) -> f64 {
        self.weights.base_value
    }

    /// Score one applicant. Pure: same input, same output.
    pub fn score(&self, features: &ApplicantFeatures) -> Result<ModelScore, ValidationError> {
        let normalized = self.normalizer.normalize(features)?;
        let raw = self.weights.raw_score(&normalized);
        let score = sigmoid(raw);
        let decision = self.thresholds.classify(score);

        debug!(
            model_version = %self.weights.version,
            raw = raw,
            score = score,
            decision = %decision,
            "Applicant scored"
        );

        Ok(ModelScore {
            raw,
            score,
            decision,
            normalized,
        })
    }

    /// Metadata describing the active model.
    pub fn card(&self) -> ModelCard {
        ModelCard {
            model_version: self.weights.version.clone(),
            feature_schema_hash: self.weights.feature_schema_hash(),
            base_value: self.weights.base_value,
            weights: self
                .weights
                .iter()
                .map(|(feature, weight)| WeightEntry {
                    feature,
                    weight,
                    reference_scale: FeatureNormalizer::reference_scale(feature),
                })
                .collect(),
            approve_threshold: self.thresholds.approve,
            review_threshold: self.thresholds.review,
        }
    }
}

/// Published description of the active model.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelCard {
    pub model_version: ModelVersion,
    pub feature_schema_hash: String,
    pub base_value: f64,
    pub weights: Vec<WeightEntry>,
    pub approve_threshold: f64,
    pub review_threshold: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightEntry {
    pub feature: Feature,
    pub weight: f64,
    pub reference_scale: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn strong_applicant() -> ApplicantFeatures {
        ApplicantFeatures {
            rent_on_time_ratio_12m: 0.98,
            utilities_on_time_ratio_12m: 0.97,
            cashflow_volatility_90d: 0.1,
            income_stability_6m: 0.9,
            avg_monthly_net_inflow_6m: 5_000.0,
            avg_daily_balance_90d: 2_500.0,
            overdraft_count_12m: 0.0,
            months_at_address: 48.0,
        }
    }

    fn weak_applicant() -> ApplicantFeatures {
        ApplicantFeatures {
            rent_on_time_ratio_12m: 0.6,
            utilities_on_time_ratio_12m: 0.7,
            cashflow_volatility_90d: 1.8,
            income_stability_6m: 0.4,
            avg_monthly_net_inflow_6m: 800.0,
            avg_daily_balance_90d: -300.0,
            overdraft_count_12m: 5.0,
            months_at_address: 3.0,
        }
    }

    #[test]
    fn boundary_score_is_inclusive_for_approve() {
        let thresholds = DecisionThresholds::new(0.65, 0.4).unwrap();
        assert_eq!(thresholds.classify(0.65), Decision::Approve);
        assert_eq!(thresholds.classify(0.649999), Decision::Review);
        assert_eq!(thresholds.classify(0.4), Decision::Review);
        assert_eq!(thresholds.classify(0.399999), Decision::Decline);
    }

    #[test]
    fn thresholds_must_be_ordered() {
        assert!(DecisionThresholds::new(0.4, 0.65).is_err());
        assert!(DecisionThresholds::new(0.5, 0.5).is_err());
        assert!(DecisionThresholds::new(1.2, 0.4).is_err());
        assert!(DecisionThresholds::new(f64::NAN, 0.4).is_err());
    }

    #[test]
    fn strong_and_weak_applicants_land_on_opposite_sides() {
        let model = ScoringModel::default();
        let strong = model.score(&strong_applicant()).unwrap();
        let weak = model.score(&weak_applicant()).unwrap();

        assert_eq!(strong.decision, Decision::Approve);
        assert_eq!(weak.decision, Decision::Decline);
        assert!(strong.score > weak.score);
    }

    #[test]
    fn score_is_sigmoid_of_raw() {
        let model = ScoringModel::default();
        let result = model.score(&strong_applicant()).unwrap();
        assert!((result.score - 1.0 / (1.0 + (-result.raw).exp())).abs() < 1e-12);
    }

    #[test]
    fn out_of_domain_input_is_rejected() {
        let mut features = strong_applicant();
        features.income_stability_6m = 1.5;
        assert!(ScoringModel::default().score(&features).is_err());
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(-1_000.0), 0.0);
        assert_eq!(sigmoid(1_000.0), 1.0);
        assert_eq!(sigmoid(0.0), 0.5);
    }

    #[test]
    fn card_lists_every_feature() {
        let card = ScoringModel::default().card();
        assert_eq!(card.weights.len(), Feature::ALL.len());
        assert_eq!(card.model_version.as_str(), "v0.1.0");
        assert_eq!(card.approve_threshold, 0.65);
    }

    fn arb_features() -> impl Strategy<Value = ApplicantFeatures> {
        (
            (0.0..=1.0f64, 0.0..=1.0f64, 0.0..5.0f64, 0.0..=1.0f64),
            (-10_000.0..100_000.0f64, -5_000.0..100_000.0f64, 0u32..50, 0u32..240),
        )
            .prop_map(|((rent, util, vol, stab), (inflow, balance, od, months))| {
                ApplicantFeatures {
                    rent_on_time_ratio_12m: rent,
                    utilities_on_time_ratio_12m: util,
                    cashflow_volatility_90d: vol,
                    income_stability_6m: stab,
                    avg_monthly_net_inflow_6m: inflow,
                    avg_daily_balance_90d: balance,
                    overdraft_count_12m: f64::from(od),
                    months_at_address: f64::from(months),
                }
            })
    }

    proptest! {
        #[test]
        fn scoring_is_deterministic_and_bounded(features in arb_features()) {
            let model = ScoringModel::default();
            let first = model.score(&features).unwrap();
            let second = model.score(&features).unwrap();

            prop_assert_eq!(first.raw.to_bits(), second.raw.to_bits());
            prop_assert_eq!(first.decision, second.decision);
            prop_assert!((0.0..=1.0).contains(&first.score));
        }

        #[test]
        fn score_is_monotonic_in_raw(a in -40.0..40.0f64, b in -40.0..40.0f64) {
            if a <= b {
                prop_assert!(sigmoid(a) <= sigmoid(b));
            } else {
                prop_assert!(sigmoid(a) >= sigmoid(b));
            }
        }
    }
}
