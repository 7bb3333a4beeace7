use axum::routing::get;
use axum::Router;

use crate::handlers::metrics;
use crate::state::AppState;

/// Routes mounted at `/metrics`.
///
/// ```text
/// GET /           -> list_metrics
/// GET /progress   -> progress
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(metrics::list_metrics))
        .route("/progress", get(metrics::progress))
}
