//! Watch command
//!
//! Follows a job's session events until the job reaches a terminal state.

use anyhow::Result;
use colored::*;
use evalq_core::domain::job::{JobId, JobStatus};
use evalq_client::{SessionController, SessionEvent};
use tokio::sync::mpsc::UnboundedReceiver;

use crate::client;
use crate::commands::list;
use crate::config::Config;

pub async fn handle_watch(id: JobId, config: &Config) -> Result<()> {
    let (session, mut events) = client::build_session(config).await?;

    println!("Watching job {}...", id.to_string().cyan());
    session.track(id);

    watch_until_terminal(&session, id, &mut events).await
}

/// Render session events until `id` finishes or the session dies
///
/// Status lines are printed only on change, so a long-running job does not
/// repeat itself every tick.
pub(crate) async fn watch_until_terminal(
    session: &SessionController,
    id: JobId,
    events: &mut UnboundedReceiver<SessionEvent>,
) -> Result<()> {
    let mut last_status: Option<JobStatus> = None;

    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Updated(job) if job.id == id => {
                if last_status != Some(job.status) {
                    last_status = Some(job.status);
                    print!("Status: {}", list::colorize_status(job.status));
                    if let Some(result) = &job.result {
                        print!("  {} {}", "=".bold(), result.bold());
                    }
                    if let Some(error) = &job.error_message {
                        print!("  {}", error.red());
                    }
                    println!();
                }
                if job.is_terminal() {
                    session.shutdown();
                    break;
                }
            }
            SessionEvent::Updated(_) | SessionEvent::Accepted { .. } => {}
            SessionEvent::History(history) => {
                println!();
                list::render_history(&history);
            }
            SessionEvent::Expired => {
                println!("{}", "Session expired; stopped watching.".red());
                break;
            }
        }
    }

    Ok(())
}
