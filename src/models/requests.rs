use serde::{Deserialize, Serialize};

use crate::models::domain::{Decision, DecisionRecord};

/// Body for the two-way comparison contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareRequest {
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    #[serde(rename = "jobId")]
    pub job_id: String,
}

/// Body for the fire-and-forget decision report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionEventRequest {
    #[serde(rename = "eventId")]
    pub event_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: String,
    pub decision: Decision,
    #[serde(rename = "decidedAt")]
    pub decided_at: String,
}

impl From<&DecisionRecord> for DecisionEventRequest {
    fn from(record: &DecisionRecord) -> Self {
        Self {
            event_id: record.event_id.to_string(),
            candidate_id: record.candidate_id.clone(),
            decision: record.decision,
            decided_at: record.decided_at.to_rfc3339(),
        }
    }
}

/// Body for the login endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
