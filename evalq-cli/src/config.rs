//! CLI configuration
//!
//! Gateway connection settings and poll intervals. The two intervals are
//! independent values, tunable per deployment.

use evalq_client::PollConfig;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// URL of the gateway service
    pub gateway_url: String,
    /// Job status poll interval, milliseconds
    pub job_poll_ms: u64,
    /// History poll interval, milliseconds
    pub history_poll_ms: u64,
}

impl Config {
    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            job_interval: Duration::from_millis(self.job_poll_ms),
            history_interval: Duration::from_millis(self.history_poll_ms),
        }
    }

    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.gateway_url.is_empty() {
            anyhow::bail!("gateway_url cannot be empty");
        }

        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://") {
            anyhow::bail!("gateway_url must start with http:// or https://");
        }

        if self.job_poll_ms == 0 {
            anyhow::bail!("job poll interval must be greater than 0");
        }

        if self.history_poll_ms == 0 {
            anyhow::bail!("history poll interval must be greater than 0");
        }

        Ok(())
    }
}
