//! Credit Scoring - fixed-weight linear model with additive explanations
//!
//! This crate provides:
//! - `FeatureNormalizer`: validated mapping of raw features into model units
//! - `ScoringModel`: `raw = base + Σ wᵢ·xᵢ`, `score = σ(raw)`, two-threshold decision
//! - `ExplainabilityEngine`: per-feature contributions and `HIGH_RISK_SIGNAL` reason codes
//! - `ScoringPipeline`: the three above wired into a single request → result call
//! - `DemoScorer`: seeded pseudo-random scorer for previews and UI demos
//! - `SyntheticApplicants`: seeded stream of plausible score requests
//!
//! Nothing here learns weights. The weight table is versioned data, and every
//! score is a pure function of the request plus that table.

#![deny(unsafe_code)]

pub mod demo;
mod error;
pub mod explain;
pub mod model;
pub mod normalize;
mod pipeline;
pub mod synthetic;
pub mod weights;

pub use demo::DemoScorer;
pub use error::{ExplainError, ScoringError};
pub use explain::{describe_reason_code, ExplainPolicy, ExplainabilityEngine, REASON_CODE_PREFIX};
pub use model::{sigmoid, DecisionThresholds, ModelCard, ModelScore, ScoringModel};
pub use normalize::{FeatureNormalizer, NormalizedFeatures};
pub use pipeline::{ScoredApplication, ScoringPipeline};
pub use synthetic::SyntheticApplicants;
pub use weights::WeightTable;
