use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use parlance_api::config::ServerConfig;
use parlance_api::router::build_app_router;
use parlance_api::state::AppState;
use parlance_convai::api::ElevenLabsApi;
use parlance_convai::config::ConvaiConfig;
use parlance_convai::service::ConversationService;
use parlance_jobs::config::ImageGenConfig;
use parlance_jobs::fal::FalQueueApi;
use parlance_jobs::gateway::JobGateway;

/// Timeout for each individual provider HTTP call.
const PROVIDER_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "parlance_api=debug,parlance_jobs=debug,parlance_convai=debug,tower_http=debug"
                    .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    let image_config = ImageGenConfig::from_env();
    let convai_config = ConvaiConfig::from_env();

    // Pipelines must give up before the HTTP layer does, or callers get a
    // bare 408 instead of a categorised error.
    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let longest_deadline = image_config
        .gateway
        .deadline
        .max(convai_config.metrics_deadline);
    if request_timeout <= longest_deadline {
        tracing::warn!(
            request_timeout_secs = config.request_timeout_secs,
            deadline_secs = longest_deadline.as_secs(),
            "REQUEST_TIMEOUT_SECS does not exceed the job deadlines",
        );
    }
    for (name, policy, deadline) in [
        ("image", image_config.gateway.policy, image_config.gateway.deadline),
        ("metrics", convai_config.metrics_policy, convai_config.metrics_deadline),
    ] {
        if policy.max_wait() >= deadline {
            tracing::warn!(
                pipeline = name,
                poll_budget_secs = policy.max_wait().as_secs(),
                deadline_secs = deadline.as_secs(),
                "Poll budget exceeds the job deadline; the deadline will end polling early",
            );
        }
    }

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = parlance_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    parlance_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    parlance_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Provider clients (one pooled HTTP client) ---
    let http = reqwest::Client::builder()
        .timeout(PROVIDER_REQUEST_TIMEOUT)
        .build()
        .expect("Failed to build HTTP client");

    let image_gateway = JobGateway::new(
        Arc::new(FalQueueApi::with_client(http.clone(), image_config.fal)),
        image_config.gateway,
    );
    let conversations = ConversationService::new(
        Arc::new(ElevenLabsApi::with_client(
            http,
            convai_config.api_url,
            convai_config.api_key,
        )),
        convai_config.agent_id,
        convai_config.metrics_policy,
    )
    .with_metrics_deadline(convai_config.metrics_deadline);

    // --- App state ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_gateway: Arc::new(image_gateway),
        conversations: Arc::new(conversations),
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    let shutdown_started = Arc::new(Notify::new());
    let server = axum::serve(listener, app)
        .with_graceful_shutdown({
            let shutdown_started = Arc::clone(&shutdown_started);
            async move {
                shutdown_signal().await;
                shutdown_started.notify_one();
            }
        })
        .into_future();

    // In-flight polls get a bounded grace period once a signal arrives.
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let drain_deadline = async {
        shutdown_started.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.expect("Server error"),
        () = drain_deadline => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Shutdown grace period elapsed, dropping in-flight requests",
            );
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
