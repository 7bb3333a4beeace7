use std::time::Duration;

use crate::fal::{FalConfig, DEFAULT_MODEL, DEFAULT_QUEUE_URL};
use crate::gateway::GatewaySettings;
use crate::job::{PollPolicy, DEFAULT_JOB_DEADLINE, DEFAULT_MAX_ATTEMPTS};
use crate::submit::{PromptTemplate, DEFAULT_SCENE_PROMPT_TEMPLATE};

/// Default poll interval in milliseconds.
const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Scene-image generation configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ImageGenConfig {
    pub fal: FalConfig,
    pub gateway: GatewaySettings,
}

impl ImageGenConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                      |
    /// |---------------------------|------------------------------|
    /// | `FAL_KEY`                 | unset (requests fail with a configuration error) |
    /// | `FAL_QUEUE_URL`           | `https://queue.fal.run`      |
    /// | `FAL_MODEL`               | `fal-ai/flux-lora`           |
    /// | `SCENE_PROMPT_TEMPLATE`   | photographic scene template  |
    /// | `IMAGE_POLL_INTERVAL_MS`  | `1000`                       |
    /// | `IMAGE_POLL_MAX_ATTEMPTS` | `10`                         |
    /// | `IMAGE_JOB_DEADLINE_SECS` | `45`                         |
    ///
    /// # Panics
    ///
    /// Panics if a numeric variable is set but does not parse.
    pub fn from_env() -> Self {
        let api_key = std::env::var("FAL_KEY").ok().filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            tracing::warn!("FAL_KEY is not set; image generation requests will fail");
        }

        let fal = FalConfig {
            api_key,
            queue_url: std::env::var("FAL_QUEUE_URL").unwrap_or_else(|_| DEFAULT_QUEUE_URL.into()),
            model: std::env::var("FAL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into()),
        };

        let template = std::env::var("SCENE_PROMPT_TEMPLATE")
            .unwrap_or_else(|_| DEFAULT_SCENE_PROMPT_TEMPLATE.into());

        let interval_ms: u64 = std::env::var("IMAGE_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| DEFAULT_POLL_INTERVAL_MS.to_string())
            .parse()
            .expect("IMAGE_POLL_INTERVAL_MS must be a valid u64");

        let max_attempts: u32 = std::env::var("IMAGE_POLL_MAX_ATTEMPTS")
            .unwrap_or_else(|_| DEFAULT_MAX_ATTEMPTS.to_string())
            .parse()
            .expect("IMAGE_POLL_MAX_ATTEMPTS must be a valid u32");

        let deadline_secs: u64 = std::env::var("IMAGE_JOB_DEADLINE_SECS")
            .unwrap_or_else(|_| DEFAULT_JOB_DEADLINE.as_secs().to_string())
            .parse()
            .expect("IMAGE_JOB_DEADLINE_SECS must be a valid u64");

        Self {
            fal,
            gateway: GatewaySettings {
                template: PromptTemplate::new(template),
                policy: PollPolicy::new(Duration::from_millis(interval_ms), max_attempts),
                deadline: Duration::from_secs(deadline_secs),
                ..Default::default()
            },
        }
    }
}
