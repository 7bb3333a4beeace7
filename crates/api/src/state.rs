use std::sync::Arc;

use parlance_convai::service::ConversationService;
use parlance_jobs::gateway::JobGateway;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: parlance_db::DbPool,
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// Scene-image generation pipeline.
    pub image_gateway: Arc<JobGateway>,
    /// Voice conversation sessions and post-call metrics.
    pub conversations: Arc<ConversationService>,
}
