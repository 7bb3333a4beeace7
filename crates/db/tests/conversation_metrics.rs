//! Integration tests for the conversation metrics repository.
//!
//! Exercises the repository layer against a real database:
//! - Insert and lookup
//! - Per-user unique constraint
//! - Ownership scoping and newest-first pagination

use sqlx::PgPool;
use uuid::Uuid;
use parlance_db::models::conversation_metric::CreateConversationMetric;
use parlance_db::repositories::ConversationMetricRepo;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_metric(user_id: Uuid, conversation_id: &str) -> CreateConversationMetric {
    CreateConversationMetric {
        user_id,
        conversation_id: conversation_id.to_string(),
        detected_errors: Some("articles, verb tense".to_string()),
        pronunciation_score: Some(7.5),
        correction_attempts: Some(2),
        duration_seconds: Some(120),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_and_find(pool: PgPool) {
    parlance_db::health_check(&pool).await.unwrap();

    let user = Uuid::new_v4();
    let created = ConversationMetricRepo::create(&pool, &new_metric(user, "conv_a"))
        .await
        .unwrap();
    assert_eq!(created.user_id, user);
    assert_eq!(created.pronunciation_score, Some(7.5));

    let found = ConversationMetricRepo::find_by_conversation(&pool, user, "conv_a")
        .await
        .unwrap()
        .expect("row should exist");
    assert_eq!(found.id, created.id);

    let other_user = ConversationMetricRepo::find_by_conversation(&pool, Uuid::new_v4(), "conv_a")
        .await
        .unwrap();
    assert!(other_user.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_optional_fields_may_be_null(pool: PgPool) {
    let input = CreateConversationMetric {
        user_id: Uuid::new_v4(),
        conversation_id: "conv_empty".into(),
        detected_errors: None,
        pronunciation_score: None,
        correction_attempts: None,
        duration_seconds: None,
    };
    let created = ConversationMetricRepo::create(&pool, &input).await.unwrap();
    assert!(created.detected_errors.is_none());
    assert!(created.duration_seconds.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_conversation_violates_unique_constraint(pool: PgPool) {
    let user = Uuid::new_v4();
    ConversationMetricRepo::create(&pool, &new_metric(user, "conv_dup"))
        .await
        .unwrap();

    let err = ConversationMetricRepo::create(&pool, &new_metric(user, "conv_dup"))
        .await
        .unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(
        db_err.constraint(),
        Some("uq_conversation_metrics_user_conversation")
    );

    // The same conversation id is fine for a different user.
    ConversationMetricRepo::create(&pool, &new_metric(Uuid::new_v4(), "conv_dup"))
        .await
        .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_by_user_is_scoped_and_paginated(pool: PgPool) {
    let user = Uuid::new_v4();
    for i in 0..5 {
        ConversationMetricRepo::create(&pool, &new_metric(user, &format!("conv_{i}")))
            .await
            .unwrap();
    }
    ConversationMetricRepo::create(&pool, &new_metric(Uuid::new_v4(), "conv_other"))
        .await
        .unwrap();

    let all = ConversationMetricRepo::list_all_by_user(&pool, user).await.unwrap();
    assert_eq!(all.len(), 5);
    assert!(all.iter().all(|m| m.user_id == user));
    assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

    let page = ConversationMetricRepo::list_by_user(&pool, user, 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    let last = ConversationMetricRepo::list_by_user(&pool, user, 2, 4).await.unwrap();
    assert_eq!(last.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_negative_duration_rejected(pool: PgPool) {
    let mut input = new_metric(Uuid::new_v4(), "conv_neg");
    input.duration_seconds = Some(-1);
    let err = ConversationMetricRepo::create(&pool, &input).await.unwrap_err();
    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23514"));
}
