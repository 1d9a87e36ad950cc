//! Job DTOs for the gateway API

use serde::{Deserialize, Serialize};

use crate::domain::job::{Job, JobId, JobStatus, de_result};

/// Request to submit a new expression for evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub expression: String,
}

/// 201 response body from `POST /calculate`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAccepted {
    pub id: JobId,
}

/// 200 response body from `GET /expressions`
#[derive(Debug, Clone, Deserialize)]
pub struct JobList {
    #[serde(default)]
    pub expressions: Vec<Job>,
}

/// 200 response body from `GET /expressions/{id}`
///
/// The canonical shape is flat: `{id?, status, result?, error_message?}`.
/// Older gateway builds nested the payload as `{status, expression: {result}}`;
/// both are accepted, and the flat fields win when both are present.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusResponse {
    #[serde(default)]
    pub id: Option<JobId>,
    pub status: JobStatus,
    #[serde(default, deserialize_with = "de_result")]
    pub result: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    expression: Option<NestedExpression>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct NestedExpression {
    #[serde(default, deserialize_with = "de_result")]
    result: Option<String>,
    #[serde(default)]
    error_message: Option<String>,
}

impl JobStatusResponse {
    /// Flattens the response into a [`Job`].
    ///
    /// `requested` fills in the id when the body omits it (the single-job
    /// endpoint is keyed by the URL, so some builds leave the id out).
    pub fn into_job(self, requested: JobId) -> Job {
        let nested = self.expression.unwrap_or_default();
        Job {
            id: self.id.unwrap_or(requested),
            status: self.status,
            result: self.result.or(nested.result),
            error_message: self.error_message.or(nested.error_message),
        }
    }
}

/// Error body returned by the gateway on non-success responses
///
/// Different gateway handlers use `message` or `error` for the same thing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message.or(self.error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_status_response() {
        let resp: JobStatusResponse =
            serde_json::from_str(r#"{"status": "done", "result": "6"}"#).unwrap();
        let job = resp.into_job(JobId(7));
        assert_eq!(job.id, JobId(7));
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.result.as_deref(), Some("6"));
    }

    #[test]
    fn nested_status_response() {
        let resp: JobStatusResponse =
            serde_json::from_str(r#"{"status": "done", "expression": {"result": 6}}"#).unwrap();
        let job = resp.into_job(JobId(7));
        assert_eq!(job.status, JobStatus::Done);
        assert_eq!(job.result.as_deref(), Some("6"));
    }

    #[test]
    fn flat_result_wins_over_nested() {
        let body = r#"{"status": "done", "result": "6", "expression": {"result": "999"}}"#;
        let resp: JobStatusResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.into_job(JobId(1)).result.as_deref(), Some("6"));
    }

    #[test]
    fn body_id_wins_over_requested() {
        let resp: JobStatusResponse =
            serde_json::from_str(r#"{"id": 12, "status": "pending"}"#).unwrap();
        assert_eq!(resp.into_job(JobId(7)).id, JobId(12));
    }

    #[test]
    fn job_list_tolerates_missing_field() {
        let list: JobList = serde_json::from_str("{}").unwrap();
        assert!(list.expressions.is_empty());
    }

    #[test]
    fn error_body_prefers_message() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message": "bad expression", "error": "other"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("bad expression"));

        let body: ErrorBody = serde_json::from_str(r#"{"error": "other"}"#).unwrap();
        assert_eq!(body.into_message().as_deref(), Some("other"));

        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.into_message().is_none());
    }
}
