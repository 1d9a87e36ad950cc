//! Job-related API operations

use std::sync::Arc;

use evalq_core::domain::job::{Job, JobId};
use evalq_core::dto::job::{ErrorBody, JobList, JobStatusResponse, SubmitAccepted, SubmitRequest};

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Transport};

pub const CALCULATE_PATH: &str = "/api/v1/calculate";
pub const EXPRESSIONS_PATH: &str = "/api/v1/expressions";

/// Client for submitting expressions and fetching their evaluation state
///
/// Stateless: no caching, no side effects beyond the network call. All
/// requests go through whatever [`Transport`] it is constructed with —
/// normally an `AuthenticatedTransport`, so session refresh is transparent
/// to every operation here.
#[derive(Clone)]
pub struct JobClient {
    transport: Arc<dyn Transport>,
}

impl JobClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Submit an expression for evaluation
    ///
    /// Surrounding whitespace is trimmed; an empty expression is rejected
    /// locally without touching the network. Arithmetic syntax is the
    /// gateway's responsibility, not validated here.
    ///
    /// # Returns
    /// The id of the accepted job.
    pub async fn submit(&self, expression: &str) -> Result<JobId> {
        let expression = expression.trim();
        if expression.is_empty() {
            return Err(ClientError::EmptyExpression);
        }

        let body = serde_json::to_value(SubmitRequest {
            expression: expression.to_string(),
        })?;
        let response = self
            .transport
            .send(ApiRequest::post(CALCULATE_PATH, body))
            .await?;

        if response.status == 201 {
            let accepted: SubmitAccepted = serde_json::from_value(response.body)?;
            Ok(accepted.id)
        } else {
            let message = serde_json::from_value::<ErrorBody>(response.body)
                .unwrap_or_default()
                .into_message()
                .unwrap_or_else(|| "the gateway declined the expression".to_string());
            Err(ClientError::SubmissionRejected(message))
        }
    }

    /// Fetch the current state of a single job
    pub async fn fetch_one(&self, id: JobId) -> Result<Job> {
        let response = self
            .transport
            .send(ApiRequest::get(format!("{EXPRESSIONS_PATH}/{id}")))
            .await?;

        if response.status != 200 {
            return Err(ClientError::FetchFailed {
                id,
                status: response.status,
            });
        }

        let parsed: JobStatusResponse = serde_json::from_value(response.body)?;
        Ok(parsed.into_job(id))
    }

    /// Fetch the full job history
    ///
    /// No ordering is guaranteed here; the consumer sorts descending by id
    /// before display.
    pub async fn fetch_all(&self) -> Result<Vec<Job>> {
        let response = self.transport.send(ApiRequest::get(EXPRESSIONS_PATH)).await?;

        if response.status != 200 {
            return Err(ClientError::api_error(
                response.status,
                "failed to fetch job history",
            ));
        }

        let list: JobList = serde_json::from_value(response.body)?;
        Ok(list.expressions)
    }
}
