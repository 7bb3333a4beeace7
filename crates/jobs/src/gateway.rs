//! Caller-facing orchestration of submit, poll and extract.
//!
//! [`JobGateway::run`] is the only place stage errors are translated into
//! the externally visible [`GatewayError`]. Upstream bodies and job ids
//! are logged, never copied into the error details.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::backend::{BackendError, JobBackend};
use crate::extract::{ExtractError, ResultExtractor};
use crate::job::{JobRequest, JobResult, PollPolicy, DEFAULT_JOB_DEADLINE};
use crate::poller::{poll_until_terminal, PollError};
use crate::submit::{submit_job, PromptTemplate, SubmitError};

// ---------------------------------------------------------------------------
// Error categories
// ---------------------------------------------------------------------------

/// Externally visible failure categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    ConfigurationError,
    ValidationError,
    UpstreamRequestError,
    UpstreamJobFailure,
    PollTimeout,
    MissingResult,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationError => "CONFIGURATION_ERROR",
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UpstreamRequestError => "UPSTREAM_REQUEST_ERROR",
            Self::UpstreamJobFailure => "UPSTREAM_JOB_FAILURE",
            Self::PollTimeout => "POLL_TIMEOUT",
            Self::MissingResult => "MISSING_RESULT",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pipeline failure as reported to the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{category}: {details}")]
pub struct GatewayError {
    pub category: ErrorCategory,
    pub details: String,
}

impl GatewayError {
    pub fn new(category: ErrorCategory, details: impl Into<String>) -> Self {
        Self {
            category,
            details: details.into(),
        }
    }
}

/// Describe a backend failure without leaking its body.
fn describe_backend_error(err: &BackendError) -> String {
    match err {
        BackendError::Request(e) if e.is_timeout() => "upstream request timed out".into(),
        BackendError::Request(_) => "could not reach the upstream API".into(),
        BackendError::Api { status, .. } => format!("upstream API returned status {status}"),
        BackendError::Malformed(_) => "upstream API returned an unexpected response".into(),
        BackendError::MissingCredential => "API credential is not configured".into(),
    }
}

impl From<SubmitError> for GatewayError {
    fn from(err: SubmitError) -> Self {
        match err {
            SubmitError::Validation(msg) => Self::new(ErrorCategory::ValidationError, msg),
            SubmitError::MissingCredential => Self::new(
                ErrorCategory::ConfigurationError,
                "API credential is not configured",
            ),
            SubmitError::Upstream(e) => Self::new(
                ErrorCategory::UpstreamRequestError,
                format!("job submission failed: {}", describe_backend_error(&e)),
            ),
        }
    }
}

impl From<PollError> for GatewayError {
    fn from(err: PollError) -> Self {
        match err {
            // The provider's own detail is logged by the poller only.
            PollError::JobFailed { .. } => Self::new(
                ErrorCategory::UpstreamJobFailure,
                "the upstream job failed",
            ),
            PollError::Timeout { attempts, .. } => Self::new(
                ErrorCategory::PollTimeout,
                format!("the job did not finish after {attempts} status checks"),
            ),
        }
    }
}

impl From<ExtractError> for GatewayError {
    fn from(_: ExtractError) -> Self {
        Self::new(
            ErrorCategory::MissingResult,
            "the completed job returned no result",
        )
    }
}

/// The whole pipeline ran past its wall-clock deadline.
pub fn deadline_exceeded(deadline: Duration) -> GatewayError {
    GatewayError::new(
        ErrorCategory::PollTimeout,
        format!("the job did not finish within {} seconds", deadline.as_secs()),
    )
}

// ---------------------------------------------------------------------------
// Gateway
// ---------------------------------------------------------------------------

/// Caller identity, carried for logging only.
#[derive(Debug, Clone, Default)]
pub struct CallerContext {
    pub user_id: Option<String>,
    pub request_id: Option<String>,
}

/// Fixed settings for a [`JobGateway`].
#[derive(Debug, Clone)]
pub struct GatewaySettings {
    pub template: PromptTemplate,
    pub policy: PollPolicy,
    pub extractor: ResultExtractor,
    /// Bound on one whole `run`, however slow individual upstream calls are.
    pub deadline: Duration,
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            template: PromptTemplate::default(),
            policy: PollPolicy::default(),
            extractor: ResultExtractor::default(),
            deadline: DEFAULT_JOB_DEADLINE,
        }
    }
}

/// Runs one independent submit/poll/extract pipeline per call.
pub struct JobGateway {
    backend: Arc<dyn JobBackend>,
    settings: GatewaySettings,
}

impl JobGateway {
    pub fn new(backend: Arc<dyn JobBackend>, settings: GatewaySettings) -> Self {
        Self { backend, settings }
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_configured()
    }

    /// Submit `request`, wait for it, and return its result locator.
    ///
    /// The pipeline is abandoned with `POLL_TIMEOUT` once the configured
    /// deadline passes, even mid-request.
    pub async fn run(
        &self,
        request: &JobRequest,
        caller: &CallerContext,
    ) -> Result<JobResult, GatewayError> {
        let deadline = self.settings.deadline;
        match tokio::time::timeout(deadline, self.run_stages(request, caller)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    user_id = caller.user_id.as_deref().unwrap_or("-"),
                    request_id = caller.request_id.as_deref().unwrap_or("-"),
                    deadline_secs = deadline.as_secs(),
                    "Generation job exceeded its deadline",
                );
                Err(deadline_exceeded(deadline))
            }
        }
    }

    async fn run_stages(
        &self,
        request: &JobRequest,
        caller: &CallerContext,
    ) -> Result<JobResult, GatewayError> {
        let user_id = caller.user_id.as_deref().unwrap_or("-");
        let request_id = caller.request_id.as_deref().unwrap_or("-");

        tracing::info!(user_id, request_id, "Submitting generation job");
        let handle = submit_job(self.backend.as_ref(), &self.settings.template, request)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, request_id, error = %e, "Job submission failed");
                GatewayError::from(e)
            })?;

        tracing::info!(
            user_id,
            request_id,
            job_id = %handle.id,
            max_attempts = self.settings.policy.max_attempts,
            "Polling generation job",
        );
        let completion = poll_until_terminal(self.backend.as_ref(), &handle, &self.settings.policy)
            .await
            .map_err(|e| {
                tracing::warn!(user_id, request_id, error = %e, "Job did not complete");
                GatewayError::from(e)
            })?;

        let extracted = self
            .settings
            .extractor
            .extract(&completion.payload)
            .map_err(|e| {
                tracing::warn!(
                    user_id,
                    request_id,
                    job_id = %handle.id,
                    error = %e,
                    payload = %completion.payload,
                    "Completed job has no result",
                );
                GatewayError::from(e)
            })?;

        tracing::info!(
            user_id,
            request_id,
            job_id = %handle.id,
            attempts = completion.attempts,
            path = ?extracted.path,
            "Generation job finished",
        );
        Ok(JobResult {
            locator: extracted.locator,
        })
    }
}
