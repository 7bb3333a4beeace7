//! The seam between the pipeline and a concrete job API.

use async_trait::async_trait;

use crate::job::{JobHandle, JobStatus};

/// Errors from a job API client.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Upstream API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging. Never shown to callers.
        body: String,
    },

    /// The response decoded but lacked a required field.
    #[error("Malformed upstream response: {0}")]
    Malformed(String),

    /// No credential is configured for the API.
    #[error("API credential is not configured")]
    MissingCredential,
}

/// Anything whose jobs can be status-checked.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Issue exactly one status check for `handle`.
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, BackendError>;
}

/// A job API that accepts new submissions.
#[async_trait]
pub trait JobBackend: StatusSource {
    /// Whether a credential is available. Checked before any submission.
    fn is_configured(&self) -> bool;

    /// Queue one job for the composed prompt.
    async fn submit(&self, prompt: &str) -> Result<JobHandle, BackendError>;
}
