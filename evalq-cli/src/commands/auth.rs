//! Login and registration commands

use anyhow::Result;
use colored::*;
use std::io::{self, Write};
use std::sync::Arc;

use evalq_client::AuthClient;

use crate::client;
use crate::config::Config;

pub async fn handle_login(login: &str, password: Option<String>, config: &Config) -> Result<()> {
    let password = password_or_prompt(password)?;
    auth_client(config)?.login(login, &password).await?;

    println!("{}", "Logged in.".green());
    println!(
        "{}",
        "Sessions are per-process; set EVALQ_LOGIN and EVALQ_PASSWORD for other commands."
            .dimmed()
    );
    Ok(())
}

pub async fn handle_register(
    login: &str,
    password: Option<String>,
    config: &Config,
) -> Result<()> {
    let password = password_or_prompt(password)?;
    auth_client(config)?.register(login, &password).await?;

    println!("{}", "Account created. You can log in now.".green());
    Ok(())
}

fn auth_client(config: &Config) -> Result<AuthClient> {
    Ok(AuthClient::new(Arc::new(client::plain_transport(config)?)))
}

fn password_or_prompt(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    print!("Password: ");
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
