//! Seeded synthetic applicants for demos, load checks and tests.
//!
//! Values are drawn uniformly from bands that resemble thin-file renters:
//! mostly on-time payments, modest balances, occasional overdrafts. Every
//! generated applicant passes feature validation.

use credit_types::{ApplicantFeatures, ScoreRequest};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Iterator of synthetic score requests with opaque `synth_<n>` tokens.
pub struct SyntheticApplicants {
    rng: StdRng,
    next: u64,
}

impl SyntheticApplicants {
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            next: 0,
        }
    }

    pub fn features(&mut self) -> ApplicantFeatures {
        let rng = &mut self.rng;
        ApplicantFeatures {
            rent_on_time_ratio_12m: rng.gen_range(0.70..=1.0),
            utilities_on_time_ratio_12m: rng.gen_range(0.75..=1.0),
            cashflow_volatility_90d: rng.gen_range(0.05..1.5),
            income_stability_6m: rng.gen_range(0.40..=1.0),
            avg_monthly_net_inflow_6m: rng.gen_range(-500.0..7_000.0),
            avg_daily_balance_90d: rng.gen_range(-1_500.0..3_500.0),
            overdraft_count_12m: f64::from(rng.gen_range(0u8..=3)),
            months_at_address: f64::from(rng.gen_range(1u8..72)),
        }
    }
}

impl Iterator for SyntheticApplicants {
    type Item = ScoreRequest;

    fn next(&mut self) -> Option<Self::Item> {
        let id = format!("synth_{:06}", self.next);
        self.next += 1;
        Some(ScoreRequest::new(id, self.features()))
    }
}
