//! Submit command
//!
//! Submits an expression, prints the assigned id, and follows the job until
//! it finishes (unless `--no-watch` is given).

use anyhow::Result;
use colored::*;
use evalq_client::ClientError;

use crate::client;
use crate::commands::watch;
use crate::config::Config;

pub async fn handle_submit(expression: &str, no_watch: bool, config: &Config) -> Result<()> {
    let (session, mut events) = client::build_session(config).await?;

    let id = match session.submit(expression).await {
        Ok(id) => id,
        Err(err @ (ClientError::EmptyExpression | ClientError::SubmissionRejected(_))) => {
            println!("{}", err.to_string().red());
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    println!("ID: {}", id.to_string().cyan().bold());
    println!("Status: {}", "pending".yellow());

    if no_watch {
        session.shutdown();
        return Ok(());
    }

    watch::watch_until_terminal(&session, id, &mut events).await
}
