use axum::routing::post;
use axum::Router;

use crate::handlers::generation;
use crate::state::AppState;

/// Mounted at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new().route("/generate-image", post(generation::generate_image))
}
