use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// One labelled outcome for fairness evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FairnessRow {
    /// Caller-defined group label; an open set, not an enum.
    pub protected_group: String,
    pub y_true: u8,
    pub y_pred: u8,
}

impl FairnessRow {
    pub fn new(protected_group: impl Into<String>, y_true: u8, y_pred: u8) -> Self {
        Self {
            protected_group: protected_group.into(),
            y_true,
            y_pred,
        }
    }
}

/// Group-level and cross-group parity statistics for one batch.
///
/// All values are point estimates. `None` means the metric is undefined for
/// the batch (insufficient evidence), which is not the same as zero disparity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FairnessReport {
    pub groups: BTreeSet<String>,
    pub demographic_parity_difference: f64,
    pub equal_opportunity_difference: Option<f64>,
    pub selection_rate_by_group: BTreeMap<String, f64>,
    /// Groups with no positive-labelled rows are absent.
    pub tpr_by_group: BTreeMap<String, f64>,
    /// Groups with no negative-labelled rows are absent.
    #[serde(default)]
    pub fpr_by_group: BTreeMap<String, f64>,
    /// max - min defined FPR; undefined when fewer than two groups have one.
    #[serde(default)]
    pub false_positive_rate_difference: Option<f64>,
    /// min / max selection rate; undefined when no group is ever selected.
    #[serde(default)]
    pub disparate_impact_ratio: Option<f64>,
    #[serde(default)]
    pub group_sizes: BTreeMap<String, usize>,
    #[serde(default = "default_positive_label")]
    pub positive_label: u8,
}

fn default_positive_label() -> u8 {
    1
}
