//! Read access to a learner's stored metrics.

use axum::extract::{Query, State};
use axum::Json;

use parlance_core::progress::{summarize, MetricSample, ProgressSummary};
use parlance_db::models::conversation_metric::ConversationMetric;
use parlance_db::repositories::ConversationMetricRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /metrics -- the caller's rows, newest first.
pub async fn list_metrics(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ConversationMetric>>>> {
    let rows = ConversationMetricRepo::list_by_user(
        &state.pool,
        auth.user_id,
        params.limit(),
        params.offset(),
    )
    .await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /metrics/progress -- aggregate summary over all of the caller's rows.
pub async fn progress(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProgressSummary>>> {
    let rows = ConversationMetricRepo::list_all_by_user(&state.pool, auth.user_id).await?;
    let samples: Vec<MetricSample> = rows.iter().map(MetricSample::from).collect();
    Ok(Json(DataResponse {
        data: summarize(&samples),
    }))
}
