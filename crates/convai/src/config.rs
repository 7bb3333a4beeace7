use std::time::Duration;

use parlance_jobs::job::{PollPolicy, DEFAULT_JOB_DEADLINE};

use crate::api::DEFAULT_API_URL;

/// Analysis usually lands a few seconds after the call ends.
const DEFAULT_METRICS_POLL_INTERVAL_MS: u64 = 2_000;
const DEFAULT_METRICS_POLL_MAX_ATTEMPTS: u32 = 15;

/// Conversation provider configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ConvaiConfig {
    pub api_key: Option<String>,
    pub api_url: String,
    /// Agent that runs practice conversations.
    pub agent_id: Option<String>,
    /// Policy for waiting on post-call analysis.
    pub metrics_policy: PollPolicy,
    /// Bound on one whole metrics wait.
    pub metrics_deadline: Duration,
}

impl ConvaiConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                     |
    /// |-----------------------------|-----------------------------|
    /// | `ELEVENLABS_API_KEY`        | unset                       |
    /// | `ELEVENLABS_API_URL`        | `https://api.elevenlabs.io` |
    /// | `CONVAI_AGENT_ID`           | unset                       |
    /// | `METRICS_POLL_INTERVAL_MS`  | `2000`                      |
    /// | `METRICS_POLL_MAX_ATTEMPTS` | `15`                        |
    /// | `METRICS_DEADLINE_SECS`     | `45`                        |
    pub fn from_env() -> Self {
        let api_key = std::env::var("ELEVENLABS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let agent_id = std::env::var("CONVAI_AGENT_ID")
            .ok()
            .filter(|a| !a.trim().is_empty());
        if agent_id.is_none() {
            tracing::warn!("CONVAI_AGENT_ID is not set; conversation sessions will fail");
        }

        let interval_ms: u64 = std::env::var("METRICS_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| DEFAULT_METRICS_POLL_INTERVAL_MS.to_string())
            .parse()
            .expect("METRICS_POLL_INTERVAL_MS must be a valid u64");

        let max_attempts: u32 = std::env::var("METRICS_POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_METRICS_POLL_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("METRICS_POLL_MAX_ATTEMPTS must be a valid u32");

        let deadline_secs: u64 = std::env::var("METRICS_DEADLINE_SECS")
            .unwrap_or_else(|_| DEFAULT_JOB_DEADLINE.as_secs().to_string())
            .parse()
            .expect("METRICS_DEADLINE_SECS must be a valid u64");

        Self {
            api_key,
            api_url: std::env::var("ELEVENLABS_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into()),
            agent_id,
            metrics_policy: PollPolicy::new(Duration::from_millis(interval_ms), max_attempts),
            metrics_deadline: Duration::from_secs(deadline_secs),
        }
    }
}
