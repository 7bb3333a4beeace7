//! Practice conversation sessions.

use serde::{Deserialize, Serialize};

use parlance_core::practice::PracticeOptions;

/// Request body for starting a conversation, as sent by the web client.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub scenario: String,
    pub language: String,
    pub difficulty: String,
    pub native_language: String,
}

impl SessionRequest {
    pub fn options(&self) -> Result<PracticeOptions, parlance_core::error::CoreError> {
        PracticeOptions::parse(
            &self.scenario,
            &self.language,
            &self.native_language,
            &self.difficulty,
        )
    }
}

/// Values substituted into the agent's prompt template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DynamicVariables {
    pub scenario: String,
    pub target_language: String,
    pub native_language: String,
    pub difficulty: String,
}

impl From<&PracticeOptions> for DynamicVariables {
    fn from(options: &PracticeOptions) -> Self {
        Self {
            scenario: options.scenario.clone(),
            target_language: options.language.name().to_string(),
            native_language: options.native_language.name().to_string(),
            difficulty: options.difficulty.as_str().to_string(),
        }
    }
}

/// Everything the client needs to open the voice conversation.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationSession {
    pub agent_id: String,
    /// Signed WebSocket URL; absent when no provider key is configured,
    /// in which case the client connects to the public agent directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_url: Option<String>,
    pub dynamic_variables: DynamicVariables,
}
