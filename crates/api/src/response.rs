//! Shared response envelope types for API handlers.
//!
//! Resource endpoints use a `{ "data": ... }` envelope. Image generation
//! answers with the flat `{ "result", "success" }` body the web client
//! already consumes.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// # Example
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Successful generation response: `{ "result": <url>, "success": true }`.
#[derive(Debug, Serialize)]
pub struct GenerationResponse {
    pub result: String,
    pub success: bool,
}

impl GenerationResponse {
    pub fn ok(result: String) -> Self {
        Self {
            result,
            success: true,
        }
    }
}
