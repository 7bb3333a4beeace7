//! Conversation flows exposed to the HTTP layer.
//!
//! Errors are reported with the same [`GatewayError`] categories as image
//! generation so clients handle both flows alike.

use std::sync::Arc;
use std::time::Duration;

use parlance_core::practice::PracticeOptions;
use parlance_jobs::gateway::{deadline_exceeded, ErrorCategory, GatewayError};
use parlance_jobs::job::{JobHandle, PollPolicy, DEFAULT_JOB_DEADLINE};
use parlance_jobs::poller::poll_until_terminal;

use crate::api::ConvaiBackend;
use crate::metrics::{extract_metrics, ConversationMetrics};
use crate::session::{ConversationSession, DynamicVariables};

/// Longest conversation id accepted from callers.
const MAX_CONVERSATION_ID_LEN: usize = 128;

pub struct ConversationService {
    backend: Arc<dyn ConvaiBackend>,
    agent_id: Option<String>,
    metrics_policy: PollPolicy,
    metrics_deadline: Duration,
}

impl ConversationService {
    pub fn new(
        backend: Arc<dyn ConvaiBackend>,
        agent_id: Option<String>,
        metrics_policy: PollPolicy,
    ) -> Self {
        Self {
            backend,
            agent_id,
            metrics_policy,
            metrics_deadline: DEFAULT_JOB_DEADLINE,
        }
    }

    /// Bound the whole metrics wait, slow provider calls included.
    pub fn with_metrics_deadline(mut self, deadline: Duration) -> Self {
        self.metrics_deadline = deadline;
        self
    }

    /// Build the session the client opens for a practice conversation.
    ///
    /// A signed URL is requested only when a provider key is configured.
    pub async fn start_session(
        &self,
        options: &PracticeOptions,
    ) -> Result<ConversationSession, GatewayError> {
        let agent_id = self.agent_id.clone().ok_or_else(|| {
            GatewayError::new(
                ErrorCategory::ConfigurationError,
                "conversation agent is not configured",
            )
        })?;

        let conversation_url = if self.backend.is_configured() {
            let url = self.backend.signed_url(&agent_id).await.map_err(|e| {
                tracing::warn!(error = %e, "Failed to fetch signed conversation URL");
                GatewayError::new(
                    ErrorCategory::UpstreamRequestError,
                    "could not create a conversation session",
                )
            })?;
            Some(url)
        } else {
            None
        };

        tracing::info!(
            language = options.language.code(),
            native_language = options.native_language.code(),
            difficulty = options.difficulty.as_str(),
            signed = conversation_url.is_some(),
            "Conversation session prepared",
        );

        Ok(ConversationSession {
            agent_id,
            conversation_url,
            dynamic_variables: DynamicVariables::from(options),
        })
    }

    /// Wait for the provider's analysis of `conversation_id` and extract
    /// its metrics.
    pub async fn collect_metrics(
        &self,
        conversation_id: &str,
    ) -> Result<ConversationMetrics, GatewayError> {
        validate_conversation_id(conversation_id)?;

        if !self.backend.is_configured() {
            return Err(GatewayError::new(
                ErrorCategory::ConfigurationError,
                "conversation API credential is not configured",
            ));
        }

        let handle = JobHandle::from_id(conversation_id);
        let polled = tokio::time::timeout(
            self.metrics_deadline,
            poll_until_terminal(self.backend.as_ref(), &handle, &self.metrics_policy),
        )
        .await
        .map_err(|_| {
            tracing::warn!(
                conversation_id,
                deadline_secs = self.metrics_deadline.as_secs(),
                "Conversation analysis exceeded its deadline",
            );
            deadline_exceeded(self.metrics_deadline)
        })?;
        let completion = polled.map_err(|e| {
            tracing::warn!(conversation_id, error = %e, "Conversation analysis unavailable");
            GatewayError::from(e)
        })?;

        let metrics = extract_metrics(&completion.payload);
        tracing::info!(
            conversation_id,
            attempts = completion.attempts,
            has_score = metrics.pronunciation_score.is_some(),
            "Conversation metrics collected",
        );
        Ok(metrics)
    }
}

/// Conversation ids are embedded in a URL path, so only a conservative
/// character set is accepted.
pub fn validate_conversation_id(id: &str) -> Result<(), GatewayError> {
    let valid = !id.is_empty()
        && id.len() <= MAX_CONVERSATION_ID_LEN
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(GatewayError::new(
            ErrorCategory::ValidationError,
            "conversation_id must be 1-128 characters of letters, digits, '-' or '_'",
        ))
    }
}
