//! Repository for the `conversation_metrics` table.

use sqlx::PgPool;
use parlance_core::types::DbId;

use crate::models::conversation_metric::{ConversationMetric, CreateConversationMetric};

/// Column list for `conversation_metrics` SELECT queries.
const COLUMNS: &str = "\
    id, user_id, conversation_id, detected_errors, pronunciation_score, \
    correction_attempts, duration_seconds, created_at";

/// Provides CRUD operations for conversation metrics.
pub struct ConversationMetricRepo;

impl ConversationMetricRepo {
    /// Insert a metrics row.
    ///
    /// A second row for the same (user, conversation) violates
    /// `uq_conversation_metrics_user_conversation`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateConversationMetric,
    ) -> Result<ConversationMetric, sqlx::Error> {
        let query = format!(
            "INSERT INTO conversation_metrics \
                (user_id, conversation_id, detected_errors, pronunciation_score, \
                 correction_attempts, duration_seconds) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ConversationMetric>(&query)
            .bind(input.user_id)
            .bind(&input.conversation_id)
            .bind(&input.detected_errors)
            .bind(input.pronunciation_score)
            .bind(input.correction_attempts)
            .bind(input.duration_seconds)
            .fetch_one(pool)
            .await
    }

    /// Find the row for a user's conversation.
    pub async fn find_by_conversation(
        pool: &PgPool,
        user_id: DbId,
        conversation_id: &str,
    ) -> Result<Option<ConversationMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_metrics \
             WHERE user_id = $1 AND conversation_id = $2"
        );
        sqlx::query_as::<_, ConversationMetric>(&query)
            .bind(user_id)
            .bind(conversation_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's rows, newest first, with pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ConversationMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_metrics \
             WHERE user_id = $1 \
             ORDER BY created_at DESC, id \
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ConversationMetric>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// All of a user's rows, for progress summaries.
    pub async fn list_all_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ConversationMetric>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM conversation_metrics \
             WHERE user_id = $1 ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, ConversationMetric>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }
}
