//! REST client for the fal.ai queue API.
//!
//! Wraps job submission (`POST {queue}/{model}`), status checks
//! (`GET .../requests/{id}/status`) and result retrieval
//! (`GET .../requests/{id}`) using [`reqwest`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::backend::{BackendError, JobBackend, StatusSource};
use crate::job::{JobHandle, JobStatus};

/// Default queue endpoint.
pub const DEFAULT_QUEUE_URL: &str = "https://queue.fal.run";
/// Default text-to-image model.
pub const DEFAULT_MODEL: &str = "fal-ai/flux-lora";

/// Connection settings for the fal.ai queue.
#[derive(Debug, Clone)]
pub struct FalConfig {
    /// API key; `None` leaves the backend unconfigured.
    pub api_key: Option<String>,
    /// Base queue URL without trailing slash.
    pub queue_url: String,
    /// Model path, e.g. `fal-ai/flux-lora`.
    pub model: String,
}

impl Default for FalConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            queue_url: DEFAULT_QUEUE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }
}

/// Response returned when a job is queued.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    /// Server-assigned identifier for the queued request.
    pub request_id: String,
    #[serde(default)]
    pub status_url: Option<String>,
    #[serde(default)]
    pub response_url: Option<String>,
}

/// Body of a status check.
#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default)]
    pub error: Option<serde_json::Value>,
}

/// Queue state reported by a status check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueueState {
    Pending,
    Completed,
    Failed(String),
}

/// Classify a status body.
///
/// `COMPLETED` with an `error` field is a failure. Unknown states are
/// treated as pending so the attempt budget bounds them.
pub fn classify_status(status: &StatusResponse) -> QueueState {
    match status.status.to_ascii_uppercase().as_str() {
        "COMPLETED" => match &status.error {
            None | Some(serde_json::Value::Null) => QueueState::Completed,
            Some(err) => QueueState::Failed(error_text(err)),
        },
        "FAILED" | "ERROR" | "CANCELLED" => QueueState::Failed(
            status
                .error
                .as_ref()
                .map(error_text)
                .unwrap_or_else(|| format!("job reported status {}", status.status)),
        ),
        _ => QueueState::Pending,
    }
}

fn error_text(err: &serde_json::Value) -> String {
    match err {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// HTTP client for the fal.ai queue.
pub struct FalQueueApi {
    client: reqwest::Client,
    config: FalConfig,
}

impl FalQueueApi {
    pub fn new(config: FalConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling across providers).
    pub fn with_client(client: reqwest::Client, config: FalConfig) -> Self {
        Self { client, config }
    }

    fn model_url(&self) -> String {
        format!(
            "{}/{}",
            self.config.queue_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn status_url(&self, handle: &JobHandle) -> String {
        handle
            .status_url
            .clone()
            .unwrap_or_else(|| format!("{}/requests/{}/status", self.model_url(), handle.id))
    }

    fn response_url(&self, handle: &JobHandle) -> String {
        handle
            .response_url
            .clone()
            .unwrap_or_else(|| format!("{}/requests/{}", self.model_url(), handle.id))
    }

    fn auth_header(&self) -> Result<String, BackendError> {
        self.config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(|k| format!("Key {k}"))
            .ok_or(BackendError::MissingCredential)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, BackendError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, BackendError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(BackendError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, BackendError> {
        let response = Self::ensure_success(response).await?;
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
    }
}

#[async_trait]
impl StatusSource for FalQueueApi {
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, BackendError> {
        let status: StatusResponse = self.get_json(&self.status_url(handle)).await?;
        match classify_status(&status) {
            QueueState::Pending => Ok(JobStatus::Pending),
            QueueState::Failed(detail) => Ok(JobStatus::Failed(detail)),
            QueueState::Completed => {
                let payload: serde_json::Value = self.get_json(&self.response_url(handle)).await?;
                Ok(JobStatus::Completed(payload))
            }
        }
    }
}

#[async_trait]
impl JobBackend for FalQueueApi {
    fn is_configured(&self) -> bool {
        self.config.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }

    async fn submit(&self, prompt: &str) -> Result<JobHandle, BackendError> {
        let body = serde_json::json!({ "prompt": prompt });

        let response = self
            .client
            .post(self.model_url())
            .header(reqwest::header::AUTHORIZATION, self.auth_header()?)
            .json(&body)
            .send()
            .await?;

        let submitted: SubmitResponse = Self::parse_response(response).await?;
        if submitted.request_id.trim().is_empty() {
            return Err(BackendError::Malformed("empty request_id".into()));
        }

        Ok(JobHandle {
            id: submitted.request_id,
            status_url: submitted.status_url,
            response_url: submitted.response_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use serde_json::json;

    use super::*;

    fn status(body: serde_json::Value) -> StatusResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn queued_and_running_are_pending() {
        assert_eq!(classify_status(&status(json!({"status": "IN_QUEUE", "queue_position": 3}))), QueueState::Pending);
        assert_eq!(classify_status(&status(json!({"status": "IN_PROGRESS", "logs": []}))), QueueState::Pending);
        assert_eq!(classify_status(&status(json!({"status": "SOMETHING_NEW"}))), QueueState::Pending);
    }

    #[test]
    fn completed_without_error() {
        assert_eq!(classify_status(&status(json!({"status": "COMPLETED"}))), QueueState::Completed);
        assert_eq!(
            classify_status(&status(json!({"status": "completed", "error": null}))),
            QueueState::Completed
        );
    }

    #[test]
    fn completed_with_error_is_failure() {
        let state = classify_status(&status(json!({"status": "COMPLETED", "error": "NSFW detected"})));
        assert_eq!(state, QueueState::Failed("NSFW detected".into()));
    }

    #[test]
    fn explicit_failure_states() {
        assert_matches!(classify_status(&status(json!({"status": "FAILED"}))), QueueState::Failed(d) if d.contains("FAILED"));
        assert_matches!(
            classify_status(&status(json!({"status": "ERROR", "error": {"code": 7}}))),
            QueueState::Failed(d) if d.contains("\"code\":7")
        );
    }

    #[test]
    fn default_urls_derive_from_model() {
        let api = FalQueueApi::new(FalConfig {
            queue_url: "https://queue.test/".into(),
            ..Default::default()
        });
        let handle = JobHandle::from_id("abc");
        assert_eq!(api.status_url(&handle), "https://queue.test/fal-ai/flux-lora/requests/abc/status");
        assert_eq!(api.response_url(&handle), "https://queue.test/fal-ai/flux-lora/requests/abc");
    }

    #[test]
    fn provider_urls_take_precedence() {
        let api = FalQueueApi::new(FalConfig::default());
        let handle = JobHandle {
            id: "abc".into(),
            status_url: Some("https://s".into()),
            response_url: Some("https://r".into()),
        };
        assert_eq!(api.status_url(&handle), "https://s");
        assert_eq!(api.response_url(&handle), "https://r");
    }

    #[test]
    fn blank_key_is_unconfigured() {
        let api = FalQueueApi::new(FalConfig {
            api_key: Some(String::new()),
            ..Default::default()
        });
        assert!(!api.is_configured());
        assert_matches!(api.auth_header(), Err(BackendError::MissingCredential));
    }

    #[tokio::test]
    async fn submit_without_key_never_sends() {
        // Port 9 (discard) on localhost; a real request would fail with a transport error.
        let api = FalQueueApi::new(FalConfig {
            queue_url: "http://127.0.0.1:9".into(),
            ..Default::default()
        });
        assert_matches!(api.submit("prompt").await, Err(BackendError::MissingCredential));
    }
}
