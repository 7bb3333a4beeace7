#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use parlance_api::auth::jwt::{generate_access_token, JwtConfig, DEFAULT_AUDIENCE};
use parlance_api::config::ServerConfig;
use parlance_api::router::build_app_router;
use parlance_api::state::AppState;
use parlance_convai::service::ConversationService;
use parlance_convai::testing::ScriptedConvai;
use parlance_jobs::gateway::{GatewaySettings, JobGateway};
use parlance_jobs::job::PollPolicy;
use parlance_jobs::testing::ScriptedBackend;

pub const TEST_AGENT_ID: &str = "agent-test";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 60,
        shutdown_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "test-jwt-secret".to_string(),
            audience: DEFAULT_AUDIENCE.to_string(),
        },
    }
}

/// A pool that never connects unless a handler touches the database.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_lazy("postgres://localhost/parlance_unused")
        .unwrap()
}

/// Image poll policy used by the test app: 1s interval, 10 attempts.
pub fn image_policy() -> PollPolicy {
    PollPolicy::new(Duration::from_secs(1), 10)
}

/// Build the full application router around scripted providers.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_app_with(
    pool: PgPool,
    images: Arc<ScriptedBackend>,
    convai: Arc<ScriptedConvai>,
) -> Router {
    let config = test_config();

    let image_gateway = JobGateway::new(
        images,
        GatewaySettings {
            policy: image_policy(),
            ..Default::default()
        },
    );
    let conversations = ConversationService::new(
        convai,
        Some(TEST_AGENT_ID.to_string()),
        PollPolicy::new(Duration::from_millis(5), 3),
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_gateway: Arc::new(image_gateway),
        conversations: Arc::new(conversations),
    };

    build_app_router(state, &config)
}

/// Build the app with default scripted providers.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_with(
        pool,
        Arc::new(ScriptedBackend::new()),
        Arc::new(ScriptedConvai::new()),
    )
}

/// A valid Bearer token for `user_id`.
pub fn token_for(user_id: Uuid) -> String {
    generate_access_token(user_id, 3600, &test_config().jwt).unwrap()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Send an unauthenticated GET.
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a GET with a Bearer token.
pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST with a JSON body and an optional Bearer token.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    app.oneshot(request).await.unwrap()
}

/// Send a POST with no body.
pub async fn post_empty(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}
