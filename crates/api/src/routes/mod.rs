pub mod conversation;
pub mod generation;
pub mod health;
pub mod metrics;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires a Bearer token (enforced by handler extractors).
///
/// ```text
/// POST /generate-image                              -> generate_image
/// POST /conversations/session                       -> start_session
/// POST /conversations/{conversation_id}/metrics     -> record_metrics
/// GET  /metrics                                     -> list_metrics
/// GET  /metrics/progress                            -> progress
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(generation::router())
        .nest("/conversations", conversation::router())
        .nest("/metrics", metrics::router())
}
