//! Versioned weight tables.

use credit_types::{Feature, ModelVersion};
use serde::{Deserialize, Serialize};

use crate::normalize::{index_of, FeatureNormalizer, NormalizedFeatures};

/// Current production weight table version.
pub const CURRENT_VERSION: &str = "v0.1.0";

/// Fixed intercept and per-feature weights, in model units.
///
/// Positive weights raise the score (lower risk), negative weights lower it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightTable {
    pub version: ModelVersion,
    pub base_value: f64,
    weights: [f64; 8],
}

impl WeightTable {
    /// `v0.1.0`: payment consistency and income stability dominate, cash-flow
    /// volatility and overdrafts pull the score down.
    pub fn v0_1_0() -> Self {
        Self {
            version: ModelVersion::new(CURRENT_VERSION),
            base_value: -5.5,
            weights: [
                2.2,   // rent_on_time_ratio_12m
                2.0,   // utilities_on_time_ratio_12m
                -0.65, // cashflow_volatility_90d
                1.6,   // income_stability_6m
                0.35,  // avg_monthly_net_inflow_6m, per 1k
                0.45,  // avg_daily_balance_90d, per 1k
                -0.35, // overdraft_count_12m
                0.05,  // months_at_address, per year
            ],
        }
    }

    /// Build a table from explicit values. Used for alternate versions and tests.
    pub fn from_parts(version: ModelVersion, base_value: f64, weights: [f64; 8]) -> Self {
        Self {
            version,
            base_value,
            weights,
        }
    }

    pub fn weight(&self, feature: Feature) -> f64 {
        self.weights[index_of(feature)]
    }

    /// `(feature, weight)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        Feature::ALL.iter().copied().zip(self.weights.iter().copied())
    }

    /// `base_value + Σ wᵢ·xᵢ`, summed in declaration order.
    pub fn raw_score(&self, normalized: &NormalizedFeatures) -> f64 {
        self.base_value
            + normalized
                .iter()
                .map(|(feature, value)| self.weight(feature) * value)
                .sum::<f64>()
    }

    /// Short content hash of the feature contract this table expects.
    ///
    /// Covers feature names, domains and reference scales in declaration
    /// order, so any change to the input contract changes the hash.
    pub fn feature_schema_hash(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"credit-feature-schema-v1:");
        for feature in Feature::ALL {
            hasher.update(feature.as_str().as_bytes());
            hasher.update(b"|");
            hasher.update(feature.domain().to_string().as_bytes());
            hasher.update(b"|");
            hasher.update(&FeatureNormalizer::reference_scale(feature).to_le_bytes());
            hasher.update(b";");
        }
        hasher.finalize().to_hex().as_str()[..16].to_string()
    }
}

impl Default for WeightTable {
    fn default() -> Self {
        Self::v0_1_0()
    }
}
