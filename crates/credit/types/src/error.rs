use thiserror::Error;

use crate::features::{Feature, FeatureDomain};

/// Malformed or out-of-domain caller input.
///
/// Raised before any computation or audit write happens and never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("feature {feature} is not a finite number")]
    NonFinite { feature: Feature },

    #[error("feature {feature} = {value} is outside its domain ({domain})")]
    OutOfDomain {
        feature: Feature,
        value: f64,
        domain: FeatureDomain,
    },

    #[error("applicant_id must be a non-empty opaque token")]
    EmptyApplicantId,

    #[error("row {index}: protected_group must not be empty")]
    EmptyGroup { index: usize },

    #[error("row {index}: {field} must be 0 or 1, got {value}")]
    InvalidLabel {
        index: usize,
        field: &'static str,
        value: u8,
    },

    #[error("positive_label must be 0 or 1, got {0}")]
    InvalidPositiveLabel(u8),

    #[error("invalid query window: {0}")]
    InvalidWindow(String),
}
