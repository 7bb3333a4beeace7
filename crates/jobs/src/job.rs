//! Value types that flow through one submit/poll/extract pipeline.

use std::time::Duration;

use serde::Serialize;

/// Parameters for one generation task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobRequest {
    /// Free-text task description (the learner's scenario).
    pub description: String,
}

impl JobRequest {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// Reference to a job queued on an external API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Provider-assigned job identifier.
    pub id: String,
    /// Status-check address, when the provider returns one.
    pub status_url: Option<String>,
    /// Result address, when the provider returns one.
    pub response_url: Option<String>,
}

impl JobHandle {
    /// A handle carrying only an identifier.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status_url: None,
            response_url: None,
        }
    }
}

/// One status observation.
#[derive(Debug, Clone, PartialEq)]
pub enum JobStatus {
    /// Queued or running.
    Pending,
    /// Finished; carries the provider's result payload.
    Completed(serde_json::Value),
    /// The provider reported the job as failed.
    Failed(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

/// The artifact handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobResult {
    /// Resource locator (an image URL for scene generation).
    pub locator: String,
}

// ---------------------------------------------------------------------------
// Poll policy
// ---------------------------------------------------------------------------

/// Default delay between status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
/// Default number of status checks before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
/// Upper bound on the attempt budget.
pub const MAX_POLL_ATTEMPTS: u32 = 120;
/// Default wall-clock bound on one whole pipeline, slow upstream calls
/// included. Kept below the default HTTP request timeout.
pub const DEFAULT_JOB_DEADLINE: Duration = Duration::from_secs(45);

/// Interval and attempt budget for one polling loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl PollPolicy {
    /// Build a policy, clamping `max_attempts` into `1..=MAX_POLL_ATTEMPTS`.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.clamp(1, MAX_POLL_ATTEMPTS),
        }
    }

    /// Longest time a loop can spend sleeping under this policy.
    pub fn max_wait(&self) -> Duration {
        self.interval * self.max_attempts.saturating_sub(1)
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_MAX_ATTEMPTS)
    }
}
