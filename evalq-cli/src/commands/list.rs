//! List command
//!
//! One-shot fetch of the job history, rendered newest first.

use anyhow::Result;
use colored::*;
use evalq_core::domain::job::{Job, JobStatus};

use crate::client;
use crate::config::Config;

pub async fn handle_list(config: &Config) -> Result<()> {
    let (session, _events) = client::build_session(config).await?;

    let history = session.fetch_history().await?;
    render_history(&history);
    Ok(())
}

pub(crate) fn render_history(history: &[Job]) {
    if history.is_empty() {
        println!("{}", "No jobs yet. Submit your first expression!".yellow());
        return;
    }

    println!("{}", format!("Found {} job(s):", history.len()).bold());
    println!();
    for job in history {
        render_job_line(job);
    }
}

pub(crate) fn render_job_line(job: &Job) {
    let mut line = format!(
        "  {} {}  {}",
        "▸".cyan(),
        job.id.to_string().bold(),
        colorize_status(job.status)
    );
    if let Some(result) = &job.result {
        line.push_str(&format!("  = {result}"));
    }
    if let Some(error) = &job.error_message {
        line.push_str(&format!("  {}", error.red()));
    }
    println!("{line}");
}

pub(crate) fn colorize_status(status: JobStatus) -> colored::ColoredString {
    let text = status.to_string();
    match status {
        JobStatus::Pending => text.yellow(),
        JobStatus::InProgress => text.cyan(),
        JobStatus::Done => text.green(),
        JobStatus::Error => text.red(),
    }
}
