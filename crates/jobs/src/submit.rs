//! Job submission: validate the description, check the credential,
//! compose the prompt, queue exactly one job.

use crate::backend::{BackendError, JobBackend};
use crate::job::{JobHandle, JobRequest};

/// Placeholder replaced by the task description.
pub const DESCRIPTION_PLACEHOLDER: &str = "{scenario}";

/// Prompt template for scene images.
pub const DEFAULT_SCENE_PROMPT_TEMPLATE: &str =
    "Realistic scene of {scenario}, photographic style, detailed environment, natural lighting";

/// Fixed prompt text the description is embedded into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    pub fn new(template: impl Into<String>) -> Self {
        Self(template.into())
    }

    /// Embed `description` into the template.
    ///
    /// Templates without a placeholder get the description prepended.
    pub fn compose(&self, description: &str) -> String {
        if self.0.contains(DESCRIPTION_PLACEHOLDER) {
            self.0.replace(DESCRIPTION_PLACEHOLDER, description)
        } else {
            format!("{description}, {}", self.0)
        }
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_SCENE_PROMPT_TEMPLATE)
    }
}

/// Errors from the submission stage.
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("{0}")]
    Validation(String),

    #[error("job API credential is not configured")]
    MissingCredential,

    #[error("job submission failed: {0}")]
    Upstream(#[from] BackendError),
}

/// Submit one job for `request`.
///
/// Validation runs first, then the credential check; neither touches the
/// network. A failed submission is returned as-is and never retried.
pub async fn submit_job<B: JobBackend + ?Sized>(
    backend: &B,
    template: &PromptTemplate,
    request: &JobRequest,
) -> Result<JobHandle, SubmitError> {
    let description = request.description.trim();
    if description.is_empty() {
        return Err(SubmitError::Validation("scenario is required".into()));
    }

    if !backend.is_configured() {
        return Err(SubmitError::MissingCredential);
    }

    let prompt = template.compose(description);
    let handle = backend.submit(&prompt).await.map_err(|e| match e {
        BackendError::MissingCredential => SubmitError::MissingCredential,
        other => SubmitError::Upstream(other),
    })?;

    tracing::debug!(job_id = %handle.id, "Job submitted");
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::testing::ScriptedBackend;

    #[test]
    fn compose_replaces_placeholder() {
        let prompt = PromptTemplate::default().compose("ordering coffee");
        assert_eq!(
            prompt,
            "Realistic scene of ordering coffee, photographic style, detailed environment, natural lighting"
        );
    }

    #[test]
    fn compose_without_placeholder_prepends() {
        let prompt = PromptTemplate::new("watercolor").compose("a market");
        assert_eq!(prompt, "a market, watercolor");
    }

    #[tokio::test]
    async fn blank_description_rejected_before_any_call() {
        let backend = ScriptedBackend::new();
        let result = submit_job(&backend, &PromptTemplate::default(), &JobRequest::new("  ")).await;
        assert_matches!(result, Err(SubmitError::Validation(_)));
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn long_description_is_submitted_unchanged() {
        let backend = ScriptedBackend::new();
        let description = "a".repeat(600);
        submit_job(
            &backend,
            &PromptTemplate::new("{scenario}"),
            &JobRequest::new(description.clone()),
        )
        .await
        .unwrap();
        assert_eq!(backend.submit_calls(), 1);
        assert_eq!(backend.last_prompt(), Some(description));
    }

    #[tokio::test]
    async fn missing_credential_makes_no_calls() {
        let backend = ScriptedBackend::unconfigured();
        let result =
            submit_job(&backend, &PromptTemplate::default(), &JobRequest::new("at the bank")).await;
        assert_matches!(result, Err(SubmitError::MissingCredential));
        assert_eq!(backend.submit_calls(), 0);
    }

    #[tokio::test]
    async fn submits_trimmed_description_once() {
        let backend = ScriptedBackend::new();
        let handle = submit_job(
            &backend,
            &PromptTemplate::new("{scenario}"),
            &JobRequest::new("  at the bank "),
        )
        .await
        .unwrap();
        assert_eq!(handle.id, "job-1");
        assert_eq!(backend.submit_calls(), 1);
        assert_eq!(backend.last_prompt().as_deref(), Some("at the bank"));
    }

    #[tokio::test]
    async fn upstream_failure_is_not_retried() {
        let backend = ScriptedBackend::new().fail_submit(BackendError::Api {
            status: 500,
            body: "oops".into(),
        });
        let result =
            submit_job(&backend, &PromptTemplate::default(), &JobRequest::new("at the bank")).await;
        assert_matches!(result, Err(SubmitError::Upstream(BackendError::Api { status: 500, .. })));
        assert_eq!(backend.submit_calls(), 1);
    }
}
