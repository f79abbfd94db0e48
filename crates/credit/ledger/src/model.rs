use std::fmt;

use chrono::{DateTime, Utc};
use credit_types::{Decision, FairnessReport, ModelVersion, RequestId, ScoreResult, ValidationError};
use serde::{Deserialize, Serialize};

use crate::applicant::ApplicantRef;

/// Page size used when a caller does not ask for one.
pub const DEFAULT_LIMIT: usize = 50;
/// Largest page a single query may request.
pub const MAX_LIMIT: usize = 1000;

/// Kind of decision activity an event records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditEventType {
    Score,
    FairnessReport,
}

impl AuditEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditEventType::Score => "score",
            AuditEventType::FairnessReport => "fairness_report",
        }
    }
}

impl fmt::Display for AuditEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields of a score outcome that may be persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScorePayload {
    pub score: f64,
    pub decision: Decision,
    pub reason_codes: Vec<String>,
}

/// Fields of a fairness report that may be persisted.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FairnessPayload {
    pub demographic_parity_difference: f64,
    pub equal_opportunity_difference: Option<f64>,
    pub positive_label: u8,
}

/// Allowlisted event payload.
///
/// Only the fields named in the variant structs can reach storage, so
/// features and self-reported audit context have no path into the ledger.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AuditPayload {
    Score(ScorePayload),
    FairnessReport(FairnessPayload),
}

impl AuditPayload {
    pub fn kind(&self) -> AuditEventType {
        match self {
            AuditPayload::Score(_) => AuditEventType::Score,
            AuditPayload::FairnessReport(_) => AuditEventType::FairnessReport,
        }
    }
}

impl From<&ScoreResult> for AuditPayload {
    fn from(result: &ScoreResult) -> Self {
        AuditPayload::Score(ScorePayload {
            score: result.score,
            decision: result.decision,
            reason_codes: result.reason_codes.clone(),
        })
    }
}

impl From<&FairnessReport> for AuditPayload {
    fn from(report: &FairnessReport) -> Self {
        AuditPayload::FairnessReport(FairnessPayload {
            demographic_parity_difference: report.demographic_parity_difference,
            equal_opportunity_difference: report.equal_opportunity_difference,
            positive_label: report.positive_label,
        })
    }
}

/// Append input. Id and timestamp are assigned by the ledger.
#[derive(Clone, Debug, PartialEq)]
pub struct AuditAppend {
    pub event_type: AuditEventType,
    pub request_id: RequestId,
    pub model_version: Option<ModelVersion>,
    pub applicant_id: Option<ApplicantRef>,
    pub payload: AuditPayload,
}

impl AuditAppend {
    pub fn score(result: &ScoreResult, applicant_id: Option<ApplicantRef>) -> Self {
        Self {
            event_type: AuditEventType::Score,
            request_id: result.request_id.clone(),
            model_version: Some(result.model_version.clone()),
            applicant_id,
            payload: result.into(),
        }
    }

    pub fn fairness_report(request_id: RequestId, report: &FairnessReport) -> Self {
        Self {
            event_type: AuditEventType::FairnessReport,
            request_id,
            model_version: None,
            applicant_id: None,
            payload: report.into(),
        }
    }
}

/// Persisted audit record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEvent {
    pub id: u64,
    pub ts: DateTime<Utc>,
    pub request_id: RequestId,
    pub event_type: AuditEventType,
    pub model_version: Option<ModelVersion>,
    pub applicant_id: Option<ApplicantRef>,
    pub payload: AuditPayload,
}

/// Paged read window. Construct through [`QueryWindow::try_new`] when the
/// values come from a caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    limit: usize,
    offset: usize,
}

impl QueryWindow {
    pub fn try_new(limit: i64, offset: i64) -> Result<Self, ValidationError> {
        if limit < 0 {
            return Err(ValidationError::InvalidWindow(format!(
                "limit must not be negative, got {limit}"
            )));
        }
        if offset < 0 {
            return Err(ValidationError::InvalidWindow(format!(
                "offset must not be negative, got {offset}"
            )));
        }
        if limit as u64 > MAX_LIMIT as u64 {
            return Err(ValidationError::InvalidWindow(format!(
                "limit must be at most {MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(Self {
            limit: limit as usize,
            offset: usize::try_from(offset).unwrap_or(usize::MAX),
        })
    }

    /// First page of at most `limit` events, clamped to [`MAX_LIMIT`].
    /// Internal shortcut; caller-supplied windows go through `try_new`.
    pub(crate) fn first(limit: usize) -> Self {
        Self {
            limit: limit.min(MAX_LIMIT),
            offset: 0,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Slice a newest-first history. An offset past the end yields nothing.
    pub(crate) fn apply<T>(&self, newest_first: impl Iterator<Item = T>) -> Vec<T> {
        newest_first.skip(self.offset).take(self.limit).collect()
    }
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self::first(DEFAULT_LIMIT)
    }
}

/// One page of audit history, newest first.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditEventList {
    /// Count of every stored event, independent of the window.
    pub total: u64,
    pub limit: usize,
    pub offset: usize,
    pub events: Vec<AuditEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_rejects_bad_input() {
        assert!(QueryWindow::try_new(-1, 0).is_err());
        assert!(QueryWindow::try_new(10, -5).is_err());
        assert!(QueryWindow::try_new(1001, 0).is_err());

        let window = QueryWindow::try_new(1000, 7).unwrap();
        assert_eq!((window.limit(), window.offset()), (1000, 7));
        assert_eq!(QueryWindow::default().limit(), DEFAULT_LIMIT);
    }

    #[test]
    fn internal_first_page_never_exceeds_max() {
        assert_eq!(QueryWindow::first(MAX_LIMIT + 1).limit(), MAX_LIMIT);
        assert_eq!(
            QueryWindow::first(MAX_LIMIT),
            QueryWindow::try_new(MAX_LIMIT as i64, 0).unwrap()
        );
    }

    #[test]
    fn window_slices_newest_first_input() {
        let window = QueryWindow::try_new(2, 1).unwrap();
        assert_eq!(window.apply([5, 4, 3, 2, 1].into_iter()), vec![4, 3]);

        let past_end = QueryWindow::try_new(10, 9).unwrap();
        assert!(past_end.apply([2, 1].into_iter()).is_empty());
    }

    #[test]
    fn score_payload_keeps_only_allowlisted_fields() {
        let payload = AuditPayload::Score(ScorePayload {
            score: 0.71,
            decision: Decision::Approve,
            reason_codes: vec![],
        });
        let json = serde_json::to_value(&payload).unwrap();
        let keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["decision", "reason_codes", "score"]);
    }

    #[test]
    fn unknown_payload_fields_are_rejected() {
        let raw = r#"{"score":0.5,"decision":"REVIEW","reason_codes":[],"rent_on_time_ratio_12m":0.9}"#;
        assert!(serde_json::from_str::<AuditPayload>(raw).is_err());
    }

    #[test]
    fn fairness_payload_decodes_null_opportunity_gap() {
        let raw = r#"{"demographic_parity_difference":0.15,"equal_opportunity_difference":null,"positive_label":1}"#;
        let payload: AuditPayload = serde_json::from_str(raw).unwrap();
        assert_eq!(payload.kind(), AuditEventType::FairnessReport);
    }

    #[test]
    fn event_type_wire_names() {
        assert_eq!(
            serde_json::to_string(&AuditEventType::FairnessReport).unwrap(),
            "\"fairness_report\""
        );
    }
}
