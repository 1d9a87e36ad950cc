//! Login and registration
//!
//! Credential issuance is an external collaborator; this client only calls
//! the endpoints and lets the cookie store pick up the session cookie. The
//! calls go through the plain transport: refresh-and-replay around a login
//! attempt would make no sense.

use serde::Serialize;
use std::sync::Arc;

use evalq_core::dto::job::ErrorBody;

use crate::error::{ClientError, Result};
use crate::transport::{ApiRequest, Transport};

pub const LOGIN_PATH: &str = "/api/v1/login";
pub const REGISTER_PATH: &str = "/api/v1/register";

#[derive(Debug, Serialize)]
struct CredentialsRequest {
    login: String,
    password: String,
}

/// Client for the gateway's credential endpoints
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<dyn Transport>,
}

impl AuthClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Log in; on success the session cookie lands in the transport's jar
    pub async fn login(&self, login: &str, password: &str) -> Result<()> {
        self.send_credentials(LOGIN_PATH, login, password).await
    }

    /// Register a new account
    pub async fn register(&self, login: &str, password: &str) -> Result<()> {
        self.send_credentials(REGISTER_PATH, login, password).await
    }

    async fn send_credentials(&self, path: &str, login: &str, password: &str) -> Result<()> {
        let body = serde_json::to_value(CredentialsRequest {
            login: login.to_string(),
            password: password.to_string(),
        })?;

        let response = self.transport.send(ApiRequest::post(path, body)).await?;
        if response.is_success() {
            return Ok(());
        }

        let message = serde_json::from_value::<ErrorBody>(response.body)
            .unwrap_or_default()
            .into_message()
            .unwrap_or_else(|| "authentication failed".to_string());
        Err(ClientError::api_error(response.status, message))
    }
}
