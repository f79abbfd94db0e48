//! Seeded fixture builder for fairness batches.
//!
//! Counts are exact: a profile asking for 40 rows at a 0.60 selection rate
//! yields exactly 24 selected rows, shuffled by the seed. Useful for
//! previews and for tests that need known parity gaps.

use credit_types::FairnessRow;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Rows to generate for one protected group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupProfile {
    pub group: String,
    pub rows: usize,
    /// Share of rows with `y_pred = 1`.
    pub selection_rate: f64,
    /// Share of rows with `y_true = 1`.
    pub base_rate: f64,
}

impl GroupProfile {
    pub fn new(group: impl Into<String>, rows: usize, selection_rate: f64, base_rate: f64) -> Self {
        Self {
            group: group.into(),
            rows,
            selection_rate: selection_rate.clamp(0.0, 1.0),
            base_rate: base_rate.clamp(0.0, 1.0),
        }
    }
}

/// Builder for a seeded synthetic batch.
#[derive(Debug, Clone)]
pub struct SyntheticBatch {
    seed: u64,
    profiles: Vec<GroupProfile>,
}

impl SyntheticBatch {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            profiles: Vec::new(),
        }
    }

    /// Default preview: 120 rows over three groups, selection 0.65 and base
    /// rate 0.60 everywhere.
    pub fn preview(seed: u64) -> Self {
        ["group_a", "group_b", "group_c"]
            .into_iter()
            .fold(Self::new(seed), |batch, group| {
                batch.group(GroupProfile::new(group, 40, 0.65, 0.60))
            })
    }

    pub fn group(mut self, profile: GroupProfile) -> Self {
        self.profiles.push(profile);
        self
    }

    pub fn profiles(&self) -> &[GroupProfile] {
        &self.profiles
    }

    /// Generate rows. The same seed and profiles always give the same batch.
    pub fn build(&self) -> Vec<FairnessRow> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        let mut rows = Vec::with_capacity(self.profiles.iter().map(|p| p.rows).sum());

        for profile in &self.profiles {
            let mut y_pred = exact_labels(profile.rows, profile.selection_rate);
            let mut y_true = exact_labels(profile.rows, profile.base_rate);
            y_pred.shuffle(&mut rng);
            y_true.shuffle(&mut rng);

            rows.extend(
                y_true
                    .into_iter()
                    .zip(y_pred)
                    .map(|(t, p)| FairnessRow::new(profile.group.clone(), t, p)),
            );
        }

        rows.shuffle(&mut rng);
        rows
    }
}

fn exact_labels(rows: usize, rate: f64) -> Vec<u8> {
    let ones = ((rows as f64) * rate).round() as usize;
    let mut labels = vec![0u8; rows];
    labels[..ones.min(rows)].fill(1);
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FairnessMetricsEngine;

    #[test]
    fn same_seed_same_batch() {
        assert_eq!(
            SyntheticBatch::preview(11).build(),
            SyntheticBatch::preview(11).build()
        );
        assert_ne!(
            SyntheticBatch::preview(11).build(),
            SyntheticBatch::preview(12).build()
        );
    }

    #[test]
    fn preview_shape() {
        let rows = SyntheticBatch::preview(3).build();
        assert_eq!(rows.len(), 120);

        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();
        assert_eq!(report.groups.len(), 3);
        for rate in report.selection_rate_by_group.values() {
            assert_eq!(*rate, 26.0 / 40.0);
        }
        assert_eq!(report.demographic_parity_difference, 0.0);
    }

    #[test]
    fn profiles_hit_requested_parity_gap() {
        let rows = SyntheticBatch::new(99)
            .group(GroupProfile::new("a", 40, 0.60, 0.5))
            .group(GroupProfile::new("b", 40, 0.50, 0.5))
            .group(GroupProfile::new("c", 40, 0.65, 0.5))
            .build();

        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();
        assert!((report.demographic_parity_difference - 0.15).abs() < 1e-12);
        assert_eq!(report.group_sizes["b"], 40);
    }
}
