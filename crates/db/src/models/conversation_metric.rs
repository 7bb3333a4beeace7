//! Conversation metric entity model and DTO.
//!
//! One row per (user, conversation), written once the conversation
//! provider has finished analysing the call.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use parlance_core::progress::MetricSample;
use parlance_core::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Entity
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ConversationMetric {
    pub id: DbId,
    pub user_id: DbId,
    pub conversation_id: String,
    pub detected_errors: Option<String>,
    pub pronunciation_score: Option<f64>,
    pub correction_attempts: Option<i32>,
    pub duration_seconds: Option<i32>,
    pub created_at: Timestamp,
}

impl From<&ConversationMetric> for MetricSample {
    fn from(row: &ConversationMetric) -> Self {
        Self {
            detected_errors: row.detected_errors.clone(),
            pronunciation_score: row.pronunciation_score,
            correction_attempts: row.correction_attempts,
            duration_seconds: row.duration_seconds,
        }
    }
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CreateConversationMetric {
    pub user_id: DbId,
    pub conversation_id: String,
    pub detected_errors: Option<String>,
    pub pronunciation_score: Option<f64>,
    pub correction_attempts: Option<i32>,
    pub duration_seconds: Option<i32>,
}
