use std::fmt;

use serde::{Deserialize, Serialize};

use crate::features::Feature;

/// Unique identifier assigned to every scoring or fairness call.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    pub fn generate() -> Self {
        Self(format!("req_{}", uuid::Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifies the weight table a score was produced with.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelVersion(pub String);

impl ModelVersion {
    pub fn new(version: impl Into<String>) -> Self {
        Self(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ModelVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Categorical credit decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    Approve,
    Review,
    Decline,
}

impl Decision {
    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Approve => "APPROVE",
            Decision::Review => "REVIEW",
            Decision::Decline => "DECLINE",
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-facing outcome of a scoring call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub request_id: RequestId,
    pub model_version: ModelVersion,
    /// Bounded score in [0, 1]; higher is more creditworthy.
    pub score: f64,
    pub decision: Decision,
    /// Ordered, possibly empty.
    pub reason_codes: Vec<String>,
}

/// One feature's share of the raw (pre-sigmoid) score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FeatureContribution {
    pub feature: Feature,
    /// Caller-supplied value, before normalisation.
    pub value: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Additive breakdown of a score.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExplainResult {
    pub request_id: RequestId,
    pub model_version: ModelVersion,
    pub score: f64,
    /// Model intercept.
    pub base_value: f64,
    /// Largest absolute driver first.
    pub contributions: Vec<FeatureContribution>,
}

impl ExplainResult {
    /// `base_value + Σ contribution`, i.e. the reconstructed raw score.
    pub fn reconstructed_raw(&self) -> f64 {
        self.base_value
            + self
                .contributions
                .iter()
                .map(|c| c.contribution)
                .sum::<f64>()
    }
}
