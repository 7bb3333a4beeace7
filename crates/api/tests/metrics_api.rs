//! Integration tests for the metrics listing and progress endpoints.

mod common;

use axum::http::StatusCode;
use sqlx::PgPool;
use uuid::Uuid;

use common::{body_json, get, get_auth, token_for};
use parlance_db::models::conversation_metric::CreateConversationMetric;
use parlance_db::repositories::ConversationMetricRepo;

async fn seed(
    pool: &PgPool,
    user_id: Uuid,
    conversation_id: &str,
    errors: Option<&str>,
    score: Option<f64>,
    duration: Option<i32>,
) {
    ConversationMetricRepo::create(
        pool,
        &CreateConversationMetric {
            user_id,
            conversation_id: conversation_id.to_string(),
            detected_errors: errors.map(String::from),
            pronunciation_score: score,
            correction_attempts: Some(1),
            duration_seconds: duration,
        },
    )
    .await
    .unwrap();
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_returns_only_callers_rows(pool: PgPool) {
    let user = Uuid::new_v4();
    for i in 0..3 {
        seed(&pool, user, &format!("conv_{i}"), None, Some(5.0), Some(60)).await;
    }
    seed(&pool, Uuid::new_v4(), "conv_other", None, None, None).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/metrics", &token_for(user)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let rows = json["data"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert!(rows.iter().all(|r| r["user_id"] == user.to_string()));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_honours_limit_and_offset(pool: PgPool) {
    let user = Uuid::new_v4();
    for i in 0..4 {
        seed(&pool, user, &format!("conv_{i}"), None, None, None).await;
    }

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/v1/metrics?limit=3", &token_for(user)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 3);

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/metrics?limit=3&offset=3", &token_for(user)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_summarises_callers_rows(pool: PgPool) {
    let user = Uuid::new_v4();
    seed(&pool, user, "conv_1", Some("Articles, verb tense"), Some(6.0), Some(120)).await;
    seed(&pool, user, "conv_2", Some("articles; word order"), Some(8.0), Some(60)).await;
    seed(&pool, user, "conv_3", Some("verb tense\narticles"), None, None).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/metrics/progress", &token_for(user)).await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["conversations"], 3);
    assert_eq!(data["total_duration_secs"], 180);
    assert_eq!(data["average_pronunciation_score"], 7.0);
    assert_eq!(data["total_correction_attempts"], 3);
    assert_eq!(data["common_errors"][0]["error"], "articles");
    assert_eq!(data["common_errors"][0]["count"], 3);
    assert_eq!(data["common_errors"][1]["error"], "verb tense");
    assert_eq!(data["common_errors"][2]["error"], "word order");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_for_new_user_is_empty(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/metrics/progress", &token_for(Uuid::new_v4())).await;

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["conversations"], 0);
    assert!(data["average_pronunciation_score"].is_null());
    assert_eq!(data["common_errors"].as_array().unwrap().len(), 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn metrics_require_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/metrics").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
