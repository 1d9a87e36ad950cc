//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod auth;
mod list;
mod submit;
mod watch;

use anyhow::Result;
use clap::Subcommand;
use evalq_core::domain::job::JobId;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit an expression and watch it to completion
    Submit {
        /// The arithmetic expression, e.g. "2+2*2"
        expression: String,

        /// Exit right after the gateway accepts the job
        #[arg(long)]
        no_watch: bool,
    },
    /// Watch an already-submitted job until it finishes
    Watch {
        /// Job id
        id: u64,
    },
    /// Show the job history, newest first
    List,
    /// Log in to the gateway
    Login {
        login: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
    /// Register a new account
    Register {
        login: String,

        /// Password (prompted when omitted)
        #[arg(long)]
        password: Option<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Submit {
            expression,
            no_watch,
        } => submit::handle_submit(&expression, no_watch, config).await,
        Commands::Watch { id } => watch::handle_watch(JobId(id), config).await,
        Commands::List => list::handle_list(config).await,
        Commands::Login { login, password } => auth::handle_login(&login, password, config).await,
        Commands::Register { login, password } => {
            auth::handle_register(&login, password, config).await
        }
    }
}
