use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::features::ApplicantFeatures;

/// Marker for a self-reported field the applicant chose not to answer.
pub const DECLINE_TO_STATE: &str = "decline_to_state";

/// A scoring request as received from a caller.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    /// Opaque applicant token. Never raw PII.
    pub applicant_id: String,
    pub features: ApplicantFeatures,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audit_context: Option<AuditContext>,
}

impl ScoreRequest {
    pub fn new(applicant_id: impl Into<String>, features: ApplicantFeatures) -> Self {
        Self {
            applicant_id: applicant_id.into(),
            features,
            audit_context: None,
        }
    }

    pub fn with_audit_context(mut self, context: AuditContext) -> Self {
        self.audit_context = Some(context);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.applicant_id.trim().is_empty() {
            return Err(ValidationError::EmptyApplicantId);
        }
        self.features.validate()
    }
}

/// Coarse, self-reported demographic context.
///
/// Carried alongside a request for monitoring callers only. It is not an
/// input to the model, and its `Debug` output is redacted so it cannot leak
/// through logs.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditContext {
    #[serde(default)]
    pub age_band: Option<String>,
    #[serde(default)]
    pub race_ethnicity: Option<String>,
    #[serde(default)]
    pub sex: Option<String>,
}

impl AuditContext {
    /// Number of fields the applicant actually answered.
    pub fn answered_fields(&self) -> usize {
        [&self.age_band, &self.race_ethnicity, &self.sex]
            .into_iter()
            .flatten()
            .filter(|value| value.as_str() != DECLINE_TO_STATE)
            .count()
    }
}

impl fmt::Debug for AuditContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditContext")
            .field("answered_fields", &self.answered_fields())
            .finish_non_exhaustive()
    }
}
