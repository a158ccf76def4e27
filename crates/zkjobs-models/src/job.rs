//! Job postings as served by the board.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a job posting.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of a single requirement check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CriterionStatus {
    Pass,
    Fail,
}

impl CriterionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CriterionStatus::Pass => "pass",
            CriterionStatus::Fail => "fail",
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, CriterionStatus::Pass)
    }
}

/// A pass/fail requirement attached to a posting
/// (e.g. "Proof of residency in the EU").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Criterion {
    pub label: String,
    pub status: CriterionStatus,
}

impl Criterion {
    pub fn new(label: impl Into<String>, status: CriterionStatus) -> Self {
        Self {
            label: label.into(),
            status,
        }
    }
}

/// A job posting. Created by the backend (or the mock layer) and never
/// mutated by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    /// Unique, immutable id
    pub id: JobId,

    pub title: String,

    pub company: String,

    /// Free-form location ("Berlin, DE", "Remote", ...)
    pub location: String,

    /// Whether the role can be done fully remote
    pub remote: bool,

    /// When the posting went live
    pub posted_at: DateTime<Utc>,

    /// Ordered requirement checks
    #[serde(default)]
    pub criteria: Vec<Criterion>,
}

impl Job {
    /// Number of criteria that passed.
    pub fn passed_criteria(&self) -> usize {
        self.criteria.iter().filter(|c| c.status.is_pass()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Job {
        Job {
            id: JobId::from_string("job-0001"),
            title: "Protocol Engineer".to_string(),
            company: "Nullifier Labs".to_string(),
            location: "Remote".to_string(),
            remote: true,
            posted_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            criteria: vec![
                Criterion::new("Age over 18", CriterionStatus::Pass),
                Criterion::new("EU residency", CriterionStatus::Fail),
            ],
        }
    }

    #[test]
    fn test_job_serializes_camel_case() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["id"], "job-0001");
        assert_eq!(json["postedAt"], "2024-05-01T12:00:00Z");
        assert_eq!(json["criteria"][1]["status"], "fail");
    }

    #[test]
    fn test_job_deserializes_without_criteria() {
        let json = r#"{
            "id": "job-7",
            "title": "Cryptographer",
            "company": "Shielded",
            "location": "Zurich, CH",
            "remote": false,
            "postedAt": "2024-01-02T03:04:05Z"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.id.as_str(), "job-7");
        assert!(job.criteria.is_empty());
    }

    #[test]
    fn test_passed_criteria() {
        assert_eq!(sample().passed_criteria(), 1);
    }
}
