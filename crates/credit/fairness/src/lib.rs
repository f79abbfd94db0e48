//! Credit Fairness - group parity statistics for decision batches
//!
//! Aggregates `(group, y_true, y_pred)` rows into selection rates, true
//! positive rates and their cross-group spreads. The engine is stateless and
//! produces point estimates only: it makes no claim of statistical
//! significance.

#![deny(unsafe_code)]

mod engine;
mod error;
pub mod synthetic;

pub use engine::FairnessMetricsEngine;
pub use error::FairnessError;
pub use synthetic::{GroupProfile, SyntheticBatch};
