//! Job domain types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Server-assigned job identifier.
///
/// Ids are unique and monotonically increasing by creation order, so sorting
/// descending by id yields newest-first display order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct JobId(pub u64);

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for JobId {
    fn from(id: u64) -> Self {
        JobId(id)
    }
}

/// One submitted expression and its evolving evaluation state
///
/// A `Job` is created by a successful submit and changes only by observing
/// gateway responses through polling; the client never mutates status or
/// result locally. `result` is present iff the job is done, `error_message`
/// iff it failed; both are absent while the job is pending or in progress.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "de_result"
    )]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// The gateway stores results as floats but some deployments serialize them
/// as strings. Accept either and normalize to a display string.
pub(crate) fn de_result<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }))
}

impl Job {
    /// Whether the job has reached a state that will never change again
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Evaluation status reported by the gateway
///
/// `Done` and `Error` are terminal: once observed, no further transition
/// occurs and polling for the job stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    InProgress,
    Done,
    Error,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }

    /// Parses a wire status string.
    ///
    /// The gateway has emitted ad-hoc transitional strings in the past
    /// (e.g. "accepted"); anything unrecognized is treated as still
    /// pending rather than failing the whole poll tick.
    pub fn parse(s: &str) -> Self {
        match s {
            "in_progress" => JobStatus::InProgress,
            "done" => JobStatus::Done,
            "error" => JobStatus::Error,
            _ => JobStatus::Pending,
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(JobStatus::parse(&s))
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            JobStatus::Pending => "pending",
            JobStatus::InProgress => "in_progress",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::InProgress.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn unknown_status_is_non_terminal() {
        let status: JobStatus = serde_json::from_str("\"accepted\"").unwrap();
        assert_eq!(status, JobStatus::Pending);
        assert!(!status.is_terminal());
    }

    #[test]
    fn job_deserializes_without_optional_fields() {
        let job: Job = serde_json::from_str(r#"{"id": 5, "status": "pending"}"#).unwrap();
        assert_eq!(job.id, JobId(5));
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.result.is_none());
        assert!(job.error_message.is_none());
    }

    #[test]
    fn numeric_result_normalizes_to_string() {
        let job: Job =
            serde_json::from_str(r#"{"id": 2, "status": "done", "result": 6.5}"#).unwrap();
        assert_eq!(job.result.as_deref(), Some("6.5"));
    }

    #[test]
    fn job_ids_order_by_creation() {
        let mut ids = vec![JobId(3), JobId(7), JobId(5)];
        ids.sort_by(|a, b| b.cmp(a));
        assert_eq!(ids, vec![JobId(7), JobId(5), JobId(3)]);
    }
}
