//! Evalq CLI
//!
//! Terminal client for the evalq expression-evaluation gateway. This binary
//! is pure presentation: it renders the session events published by
//! `evalq-client` and contains no job-tracking logic of its own.

mod client;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "evalq")]
#[command(about = "Client for the evalq expression-evaluation gateway", long_about = None)]
struct Cli {
    /// Gateway URL
    #[arg(
        long,
        env = "EVALQ_GATEWAY_URL",
        default_value = "http://localhost:8080"
    )]
    gateway_url: String,

    /// Job status poll interval in milliseconds
    #[arg(long, env = "EVALQ_JOB_POLL_MS", default_value_t = 1000)]
    job_poll_ms: u64,

    /// History poll interval in milliseconds
    #[arg(long, env = "EVALQ_HISTORY_POLL_MS", default_value_t = 5000)]
    history_poll_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evalq_client=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        gateway_url: cli.gateway_url,
        job_poll_ms: cli.job_poll_ms,
        history_poll_ms: cli.history_poll_ms,
    };
    config.validate()?;

    handle_command(cli.command, &config).await
}
