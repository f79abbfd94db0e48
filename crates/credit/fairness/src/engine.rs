use std::collections::BTreeMap;

use credit_types::{FairnessReport, FairnessRow, ValidationError};
use tracing::debug;

use crate::error::FairnessError;

/// Per-group counters accumulated in a single pass.
#[derive(Debug, Default, Clone, Copy)]
struct GroupTally {
    rows: usize,
    selected: usize,
    positives: usize,
    true_positives: usize,
    negatives: usize,
    false_positives: usize,
}

impl GroupTally {
    fn selection_rate(&self) -> f64 {
        self.selected as f64 / self.rows as f64
    }

    fn true_positive_rate(&self) -> Option<f64> {
        (self.positives > 0).then(|| self.true_positives as f64 / self.positives as f64)
    }

    fn false_positive_rate(&self) -> Option<f64> {
        (self.negatives > 0).then(|| self.false_positives as f64 / self.negatives as f64)
    }
}

/// Stateless engine computing group parity statistics.
#[derive(Debug, Default, Clone, Copy)]
pub struct FairnessMetricsEngine;

impl FairnessMetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate with `1` as the favourable outcome.
    pub fn evaluate(&self, rows: &[FairnessRow]) -> Result<FairnessReport, FairnessError> {
        self.evaluate_with_label(rows, 1)
    }

    /// Evaluate treating `positive_label` as the favourable outcome for
    /// selection and for true/false positive counting.
    pub fn evaluate_with_label(
        &self,
        rows: &[FairnessRow],
        positive_label: u8,
    ) -> Result<FairnessReport, FairnessError> {
        if positive_label > 1 {
            return Err(ValidationError::InvalidPositiveLabel(positive_label).into());
        }
        if rows.is_empty() {
            return Err(FairnessError::InsufficientData);
        }

        let mut tallies: BTreeMap<&str, GroupTally> = BTreeMap::new();
        for (index, row) in rows.iter().enumerate() {
            validate_row(index, row)?;

            let tally = tallies.entry(row.protected_group.as_str()).or_default();
            let predicted = row.y_pred == positive_label;
            let actual = row.y_true == positive_label;
            tally.rows += 1;
            if predicted {
                tally.selected += 1;
            }
            if actual {
                tally.positives += 1;
                if predicted {
                    tally.true_positives += 1;
                }
            } else {
                tally.negatives += 1;
                if predicted {
                    tally.false_positives += 1;
                }
            }
        }

        let selection_rate_by_group: BTreeMap<String, f64> = tallies
            .iter()
            .map(|(group, tally)| (group.to_string(), tally.selection_rate()))
            .collect();
        let tpr_by_group: BTreeMap<String, f64> = tallies
            .iter()
            .filter_map(|(group, tally)| {
                tally
                    .true_positive_rate()
                    .map(|tpr| (group.to_string(), tpr))
            })
            .collect();
        let fpr_by_group: BTreeMap<String, f64> = tallies
            .iter()
            .filter_map(|(group, tally)| {
                tally
                    .false_positive_rate()
                    .map(|fpr| (group.to_string(), fpr))
            })
            .collect();
        let group_sizes: BTreeMap<String, usize> = tallies
            .iter()
            .map(|(group, tally)| (group.to_string(), tally.rows))
            .collect();

        // Non-empty: at least one row was tallied.
        let (min_rate, max_rate) = spread(selection_rate_by_group.values().copied())
            .unwrap_or((0.0, 0.0));
        let demographic_parity_difference = max_rate - min_rate;

        let equal_opportunity_difference = defined_spread(&tpr_by_group);
        let false_positive_rate_difference = defined_spread(&fpr_by_group);

        let disparate_impact_ratio = (max_rate > 0.0).then(|| min_rate / max_rate);

        debug!(
            rows = rows.len(),
            groups = tallies.len(),
            positive_label,
            demographic_parity_difference,
            "Fairness batch evaluated"
        );

        Ok(FairnessReport {
            groups: selection_rate_by_group.keys().cloned().collect(),
            demographic_parity_difference,
            equal_opportunity_difference,
            selection_rate_by_group,
            tpr_by_group,
            fpr_by_group,
            false_positive_rate_difference,
            disparate_impact_ratio,
            group_sizes,
            positive_label,
        })
    }
}

fn validate_row(index: usize, row: &FairnessRow) -> Result<(), ValidationError> {
    if row.protected_group.trim().is_empty() {
        return Err(ValidationError::EmptyGroup { index });
    }
    if row.y_true > 1 {
        return Err(ValidationError::InvalidLabel {
            index,
            field: "y_true",
            value: row.y_true,
        });
    }
    if row.y_pred > 1 {
        return Err(ValidationError::InvalidLabel {
            index,
            field: "y_pred",
            value: row.y_pred,
        });
    }
    Ok(())
}

/// max - min over per-group rates; needs at least two groups.
fn defined_spread(rates: &BTreeMap<String, f64>) -> Option<f64> {
    if rates.len() < 2 {
        return None;
    }
    spread(rates.values().copied()).map(|(min, max)| max - min)
}

fn spread(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values.fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((min, max)) => Some((min.min(v), max.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// `rows` rows for `group`, the first `selected` predicted positive.
    fn block(group: &str, rows: usize, selected: usize) -> Vec<FairnessRow> {
        (0..rows)
            .map(|i| FairnessRow::new(group, 1, u8::from(i < selected)))
            .collect()
    }

    #[test]
    fn parity_difference_is_rate_spread() {
        let mut rows = block("a", 40, 24);
        rows.extend(block("b", 40, 20));
        rows.extend(block("c", 40, 26));

        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();

        assert!((report.demographic_parity_difference - 0.15).abs() < 1e-12);
        assert!((report.selection_rate_by_group["a"] - 0.60).abs() < 1e-12);
        assert!((report.selection_rate_by_group["b"] - 0.50).abs() < 1e-12);
        assert!((report.selection_rate_by_group["c"] - 0.65).abs() < 1e-12);
        assert_eq!(report.group_sizes["a"], 40);
        let dir = report.disparate_impact_ratio.unwrap();
        assert!((dir - 0.50 / 0.65).abs() < 1e-12);
    }

    #[test]
    fn group_without_positives_has_no_tpr() {
        let rows = vec![
            FairnessRow::new("x", 1, 1),
            FairnessRow::new("x", 1, 0),
            FairnessRow::new("y", 0, 1),
            FairnessRow::new("y", 0, 0),
        ];
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();

        assert_eq!(report.tpr_by_group.get("x"), Some(&0.5));
        assert!(!report.tpr_by_group.contains_key("y"));
        assert!(report.selection_rate_by_group.contains_key("y"));
        assert_eq!(report.equal_opportunity_difference, None);
    }

    #[test]
    fn equal_opportunity_over_defined_groups() {
        let rows = vec![
            FairnessRow::new("x", 1, 1),
            FairnessRow::new("x", 1, 1),
            FairnessRow::new("y", 1, 1),
            FairnessRow::new("y", 1, 0),
            FairnessRow::new("z", 0, 0),
        ];
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();
        assert_eq!(report.equal_opportunity_difference, Some(0.5));
    }

    #[test]
    fn false_positive_rates_over_negative_rows() {
        let rows = vec![
            FairnessRow::new("x", 0, 1),
            FairnessRow::new("x", 0, 0),
            FairnessRow::new("x", 0, 0),
            FairnessRow::new("x", 0, 0),
            FairnessRow::new("y", 0, 1),
            FairnessRow::new("y", 0, 1),
            FairnessRow::new("y", 1, 1),
            FairnessRow::new("z", 1, 0),
        ];
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();

        assert_eq!(report.fpr_by_group.get("x"), Some(&0.25));
        assert_eq!(report.fpr_by_group.get("y"), Some(&1.0));
        // Only positive-labelled rows in z.
        assert!(!report.fpr_by_group.contains_key("z"));
        assert_eq!(report.false_positive_rate_difference, Some(0.75));
    }

    #[test]
    fn single_negative_group_leaves_fpr_gap_undefined() {
        let rows = vec![
            FairnessRow::new("x", 0, 1),
            FairnessRow::new("y", 1, 1),
        ];
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();
        assert_eq!(report.fpr_by_group.len(), 1);
        assert_eq!(report.false_positive_rate_difference, None);
    }

    #[test]
    fn single_group_has_zero_parity_gap() {
        let report = FairnessMetricsEngine::new()
            .evaluate(&block("only", 10, 3))
            .unwrap();
        assert_eq!(report.demographic_parity_difference, 0.0);
        assert_eq!(report.equal_opportunity_difference, None);
        assert_eq!(report.groups.len(), 1);
    }

    #[test]
    fn nobody_selected_leaves_impact_ratio_undefined() {
        let mut rows = block("a", 5, 0);
        rows.extend(block("b", 5, 0));
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();
        assert_eq!(report.demographic_parity_difference, 0.0);
        assert_eq!(report.disparate_impact_ratio, None);
    }

    #[test]
    fn zero_as_positive_label_flips_selection() {
        let rows = block("a", 4, 1);
        let report = FairnessMetricsEngine::new()
            .evaluate_with_label(&rows, 0)
            .unwrap();
        assert_eq!(report.selection_rate_by_group["a"], 0.75);
        assert_eq!(report.positive_label, 0);
        // No row has y_true == 0.
        assert!(report.tpr_by_group.is_empty());
        assert_eq!(report.fpr_by_group["a"], 0.75);
    }

    #[test]
    fn empty_batch_is_insufficient() {
        assert_eq!(
            FairnessMetricsEngine::new().evaluate(&[]),
            Err(FairnessError::InsufficientData)
        );
    }

    #[test]
    fn malformed_rows_name_their_index() {
        let engine = FairnessMetricsEngine::new();
        let rows = vec![FairnessRow::new("a", 1, 1), FairnessRow::new("a", 2, 1)];
        assert_eq!(
            engine.evaluate(&rows),
            Err(FairnessError::Validation(ValidationError::InvalidLabel {
                index: 1,
                field: "y_true",
                value: 2,
            }))
        );

        let rows = vec![FairnessRow::new(" ", 1, 1)];
        assert_eq!(
            engine.evaluate(&rows),
            Err(FairnessError::Validation(ValidationError::EmptyGroup {
                index: 0
            }))
        );

        assert_eq!(
            engine.evaluate_with_label(&block("a", 2, 1), 7),
            Err(FairnessError::Validation(
                ValidationError::InvalidPositiveLabel(7)
            ))
        );
    }

    #[test]
    fn report_survives_json() {
        let mut rows = block("group_a", 10, 6);
        rows.extend(block("group_b", 10, 4));
        rows.push(FairnessRow::new("group_c", 0, 1));
        let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();

        let json = serde_json::to_string(&report).unwrap();
        let back: FairnessReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back, report);
    }

    fn arb_rows() -> impl Strategy<Value = Vec<FairnessRow>> {
        prop::collection::vec(
            (prop::sample::select(vec!["a", "b", "c", "d"]), 0u8..=1, 0u8..=1)
                .prop_map(|(g, t, p)| FairnessRow::new(g, t, p)),
            1..200,
        )
    }

    proptest! {
        #[test]
        fn metrics_stay_within_unit_interval(rows in arb_rows()) {
            let report = FairnessMetricsEngine::new().evaluate(&rows).unwrap();

            prop_assert!((0.0..=1.0).contains(&report.demographic_parity_difference));
            if let Some(eod) = report.equal_opportunity_difference {
                prop_assert!((0.0..=1.0).contains(&eod));
                prop_assert!(report.tpr_by_group.len() >= 2);
            }
            if let Some(gap) = report.false_positive_rate_difference {
                prop_assert!((0.0..=1.0).contains(&gap));
                prop_assert!(report.fpr_by_group.len() >= 2);
            }
            if let Some(ratio) = report.disparate_impact_ratio {
                prop_assert!((0.0..=1.0).contains(&ratio));
            }
            let total: usize = report.group_sizes.values().sum();
            prop_assert_eq!(total, rows.len());
        }

        #[test]
        fn row_order_does_not_matter(rows in arb_rows()) {
            let engine = FairnessMetricsEngine::new();
            let mut reversed = rows.clone();
            reversed.reverse();
            prop_assert_eq!(engine.evaluate(&rows).unwrap(), engine.evaluate(&reversed).unwrap());
        }
    }
}
