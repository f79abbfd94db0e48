//! Seeded pseudo-random scorer for previews and UI demos.
//!
//! Never used for real decisions: production scoring goes through
//! [`ScoringModel`](crate::ScoringModel), which has no randomness.

use std::sync::Mutex;

use credit_types::{ModelVersion, RequestId, ScoreRequest, ScoreResult};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::ScoringError;
use crate::model::DecisionThresholds;

/// Version tag stamped on demo results so they cannot pass for model output.
pub const DEMO_MODEL_VERSION: &str = "demo";

/// Demo scores are drawn uniformly from `[FLOOR, FLOOR + SPAN)`.
const FLOOR: f64 = 0.55;
const SPAN: f64 = 0.25;

/// Draws scores from an injected random source.
///
/// The same seed yields the same sequence of scores, so demos and tests are
/// reproducible.
pub struct DemoScorer<R = StdRng> {
    rng: Mutex<R>,
    thresholds: DecisionThresholds,
}

impl DemoScorer<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: RngCore> DemoScorer<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng: Mutex::new(rng),
            thresholds: DecisionThresholds::default(),
        }
    }

    pub fn with_thresholds(mut self, thresholds: DecisionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Produce a demo result. Input is still validated so demo flows reject
    /// the same malformed requests as the real model.
    pub fn score(&self, request: &ScoreRequest) -> Result<ScoreResult, ScoringError> {
        request.validate()?;

        let draw: f64 = {
            let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            rng.gen()
        };
        let score = (FLOOR + draw * SPAN).clamp(0.0, 1.0);

        Ok(ScoreResult {
            request_id: RequestId::generate(),
            model_version: ModelVersion::new(DEMO_MODEL_VERSION),
            score,
            decision: self.thresholds.classify(score),
            reason_codes: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_types::ApplicantFeatures;

    fn request() -> ScoreRequest {
        ScoreRequest::new(
            "tok_demo",
            ApplicantFeatures {
                rent_on_time_ratio_12m: 0.9,
                utilities_on_time_ratio_12m: 0.9,
                cashflow_volatility_90d: 0.2,
                income_stability_6m: 0.8,
                avg_monthly_net_inflow_6m: 3_000.0,
                avg_daily_balance_90d: 800.0,
                overdraft_count_12m: 0.0,
                months_at_address: 18.0,
            },
        )
    }

    #[test]
    fn same_seed_same_scores() {
        let a = DemoScorer::seeded(7);
        let b = DemoScorer::seeded(7);
        for _ in 0..5 {
            let left = a.score(&request()).unwrap();
            let right = b.score(&request()).unwrap();
            assert_eq!(left.score.to_bits(), right.score.to_bits());
            assert_eq!(left.decision, right.decision);
        }
    }

    #[test]
    fn scores_stay_in_demo_band() {
        let scorer = DemoScorer::seeded(42);
        for _ in 0..100 {
            let result = scorer.score(&request()).unwrap();
            assert!((FLOOR..FLOOR + SPAN).contains(&result.score));
            assert_eq!(result.model_version.as_str(), DEMO_MODEL_VERSION);
        }
    }

    #[test]
    fn demo_still_validates() {
        let mut bad = request();
        bad.features.rent_on_time_ratio_12m = 2.0;
        assert!(DemoScorer::seeded(1).score(&bad).is_err());
    }
}
