//! Gateway wiring
//!
//! Builds the transport stack the commands share: an HTTP transport with a
//! cookie store, wrapped in the refresh-and-replay layer. Sessions are
//! cookie-based and live only as long as this process, so authenticated
//! commands can establish one up front from `EVALQ_LOGIN`/`EVALQ_PASSWORD`.

use anyhow::{Context, Result};
use colored::*;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;

use evalq_client::{
    AuthClient, AuthenticatedTransport, HttpTransport, JobClient, SessionController, SessionEvent,
};

use crate::config::Config;

/// Build a session controller plus its event stream
pub async fn build_session(
    config: &Config,
) -> Result<(SessionController, UnboundedReceiver<SessionEvent>)> {
    let jobs = build_job_client(config).await?;
    Ok(SessionController::new(jobs, config.poll_config()))
}

/// Build a job client over the authenticated transport
pub async fn build_job_client(config: &Config) -> Result<JobClient> {
    let http = Arc::new(plain_transport(config)?);

    if let (Ok(login), Ok(password)) = (
        std::env::var("EVALQ_LOGIN"),
        std::env::var("EVALQ_PASSWORD"),
    ) {
        AuthClient::new(http.clone())
            .login(&login, &password)
            .await
            .context("automatic login failed")?;
    }

    let transport = AuthenticatedTransport::new(http).with_session_expired_hook(|| {
        eprintln!(
            "{}",
            "Session expired. Run `evalq login <login>` to sign in again.".red()
        );
    });

    Ok(JobClient::new(Arc::new(transport)))
}

/// Bare HTTP transport, for the credential endpoints
pub fn plain_transport(config: &Config) -> Result<HttpTransport> {
    HttpTransport::new(&config.gateway_url).context("failed to build the HTTP client")
}
