//! Handlers for voice practice conversations.
//!
//! Provides:
//! - Session bootstrap (agent id, optional signed URL, prompt variables).
//! - Post-call metrics collection, stored once per user and conversation.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use parlance_convai::service::validate_conversation_id;
use parlance_convai::session::{ConversationSession, SessionRequest};
use parlance_core::error::CoreError;
use parlance_db::models::conversation_metric::CreateConversationMetric;
use parlance_db::repositories::ConversationMetricRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /conversations/session
// ---------------------------------------------------------------------------

pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
    body: Result<Json<SessionRequest>, JsonRejection>,
) -> AppResult<Json<DataResponse<ConversationSession>>> {
    let Json(input) = body.map_err(|rejection| CoreError::Validation(rejection.body_text()))?;
    let options = input.options()?;
    let session = state.conversations.start_session(&options).await?;

    tracing::info!(user_id = %auth.user_id, agent_id = %session.agent_id, "Conversation session started");

    Ok(Json(DataResponse { data: session }))
}

// ---------------------------------------------------------------------------
// POST /conversations/{conversation_id}/metrics
// ---------------------------------------------------------------------------

/// Wait for the provider's analysis of a finished conversation and store
/// the extracted metrics for the caller.
pub async fn record_metrics(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(conversation_id): Path<String>,
) -> AppResult<impl IntoResponse> {
    validate_conversation_id(&conversation_id)?;

    // Checked up front so a repeat request does not poll the provider again.
    if ConversationMetricRepo::find_by_conversation(&state.pool, auth.user_id, &conversation_id)
        .await?
        .is_some()
    {
        return Err(AppError::Core(CoreError::Conflict(format!(
            "Metrics for conversation {conversation_id} are already recorded"
        ))));
    }

    let metrics = state.conversations.collect_metrics(&conversation_id).await?;

    let input = CreateConversationMetric {
        user_id: auth.user_id,
        conversation_id,
        detected_errors: metrics.detected_errors,
        pronunciation_score: metrics.pronunciation_score,
        correction_attempts: metrics.correction_attempts,
        duration_seconds: metrics.duration_seconds,
    };
    let row = ConversationMetricRepo::create(&state.pool, &input).await?;

    tracing::info!(
        user_id = %auth.user_id,
        conversation_id = %row.conversation_id,
        metric_id = %row.id,
        "Conversation metrics recorded",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: row })))
}
