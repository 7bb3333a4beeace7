//! Scene image generation.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use parlance_jobs::gateway::{CallerContext, ErrorCategory, GatewayError};
use parlance_jobs::job::JobRequest;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::GenerationResponse;
use crate::state::AppState;

/// Body of `POST /generate-image`.
#[derive(Debug, Deserialize)]
pub struct GenerateImageRequest {
    /// Free-text practice scenario to illustrate.
    #[serde(default)]
    pub scenario: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /generate-image
// ---------------------------------------------------------------------------

/// Generate a scene image for the caller's scenario and return its URL.
///
/// Holds the connection open for the whole submit/poll cycle.
pub async fn generate_image(
    auth: AuthUser,
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateImageRequest>, JsonRejection>,
) -> AppResult<Json<GenerationResponse>> {
    let Json(input) = body.map_err(|rejection| {
        GatewayError::new(ErrorCategory::ValidationError, rejection.body_text())
    })?;

    let caller = CallerContext {
        user_id: Some(auth.user_id.to_string()),
        request_id: headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from),
    };

    let request = JobRequest::new(input.scenario.unwrap_or_default());
    let result = state.image_gateway.run(&request, &caller).await?;

    Ok(Json(GenerationResponse::ok(result.locator)))
}
