//! Route definitions for practice conversations.

use axum::routing::post;
use axum::Router;

use crate::handlers::conversation;
use crate::state::AppState;

/// Routes mounted at `/conversations`.
///
/// ```text
/// POST /session                      -> start_session
/// POST /{conversation_id}/metrics    -> record_metrics
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/session", post(conversation::start_session))
        .route(
            "/{conversation_id}/metrics",
            post(conversation::record_metrics),
        )
}
