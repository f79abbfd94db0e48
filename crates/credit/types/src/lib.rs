//! Credit Types - shared data model for the decisioning core
//!
//! Every crate in the decisioning workspace speaks these types:
//! - applicant features and their declared domains
//! - score / explanation results
//! - fairness rows and reports
//! - the validation error raised before any computation runs
//!
//! None of these types carries raw PII. Applicant identifiers are opaque
//! tokens, and self-reported audit context is never serialized into results.

#![deny(unsafe_code)]

mod error;
mod fairness;
mod features;
mod request;
mod result;

pub use error::ValidationError;
pub use fairness::{FairnessReport, FairnessRow};
pub use features::{ApplicantFeatures, Feature, FeatureDomain};
pub use request::{AuditContext, ScoreRequest, DECLINE_TO_STATE};
pub use result::{Decision, ExplainResult, FeatureContribution, ModelVersion, RequestId, ScoreResult};
