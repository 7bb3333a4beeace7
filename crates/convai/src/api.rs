//! REST client for the ElevenLabs Conversational AI endpoints.

use async_trait::async_trait;
use serde::Deserialize;

use parlance_jobs::backend::{BackendError, StatusSource};
use parlance_jobs::job::{JobHandle, JobStatus};

/// Default API base URL.
pub const DEFAULT_API_URL: &str = "https://api.elevenlabs.io";

/// A conversation provider: signed session URLs plus conversation
/// status checks (the handle id is the conversation id).
#[async_trait]
pub trait ConvaiBackend: StatusSource {
    fn is_configured(&self) -> bool;

    /// Fetch a signed WebSocket URL for `agent_id`.
    async fn signed_url(&self, agent_id: &str) -> Result<String, BackendError>;
}

#[derive(Debug, Deserialize)]
struct SignedUrlResponse {
    signed_url: String,
}

/// Classify a conversation detail body.
///
/// `done` is terminal success and `failed` is terminal failure; every
/// other state (`initiated`, `in-progress`, `processing`) is pending.
pub fn classify_conversation(body: serde_json::Value) -> JobStatus {
    let status = body
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    match status.as_str() {
        "done" => JobStatus::Completed(body),
        "failed" => JobStatus::Failed("conversation analysis failed".into()),
        _ => JobStatus::Pending,
    }
}

/// HTTP client for the ElevenLabs API.
pub struct ElevenLabsApi {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
}

impl ElevenLabsApi {
    pub fn new(api_url: String, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), api_url, api_key)
    }

    pub fn with_client(client: reqwest::Client, api_url: String, api_key: Option<String>) -> Self {
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    fn key(&self) -> Result<&str, BackendError> {
        self.api_key.as_deref().ok_or(BackendError::MissingCredential)
    }

    /// Retrieve the raw conversation detail document.
    pub async fn get_conversation(
        &self,
        conversation_id: &str,
    ) -> Result<serde_json::Value, BackendError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/convai/conversations/{conversation_id}",
                self.api_url
            ))
            .header("xi-api-key", self.key()?)
            .send()
            .await?;

        parse_response(response).await
    }
}

async fn parse_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, BackendError> {
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
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| BackendError::Malformed(e.to_string()))
}

#[async_trait]
impl StatusSource for ElevenLabsApi {
    async fn check_status(&self, handle: &JobHandle) -> Result<JobStatus, BackendError> {
        let body = self.get_conversation(&handle.id).await?;
        Ok(classify_conversation(body))
    }
}

#[async_trait]
impl ConvaiBackend for ElevenLabsApi {
    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn signed_url(&self, agent_id: &str) -> Result<String, BackendError> {
        let response = self
            .client
            .get(format!(
                "{}/v1/convai/conversation/get_signed_url",
                self.api_url
            ))
            .query(&[("agent_id", agent_id)])
            .header("xi-api-key", self.key()?)
            .send()
            .await?;

        let body: SignedUrlResponse = parse_response(response).await?;
        Ok(body.signed_url)
    }
}
