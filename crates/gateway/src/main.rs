//! PaperScope API Gateway
//!
//! The single HTTP entry point:
//! - Paper search and related-work ranking
//! - Similarity graph construction
//! - Chat proxy
//! - Static explorer page
//! - Observability (logging, metrics, request ids)

mod handlers;
mod middleware;

use axum::{
    error_handling::HandleErrorLayer,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use paperscope_common::{
    chat::{self, ChatCompleter},
    config::{AppConfig, ObservabilityConfig},
    errors::AppError,
    metrics, sources,
};
use paperscope_search::ExploreService;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower::{timeout::TimeoutLayer, BoxError, ServiceBuilder};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub explorer: Arc<ExploreService>,
    pub chat: Arc<dyn ChatCompleter>,
}

impl AppState {
    /// Wire collaborators from configuration
    pub fn from_config(config: AppConfig) -> paperscope_common::Result<Self> {
        let source = sources::create_source(&config.source)?;
        let chat = chat::create_completer(&config.chat)?;
        let explorer = ExploreService::new(source, config.pipeline.clone(), &config.source);

        Ok(Self {
            config: Arc::new(config),
            explorer: Arc::new(explorer),
            chat,
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    init_tracing(&config.observability);

    info!(
        service = %config.observability.service_name,
        "Starting PaperScope API Gateway v{}",
        paperscope_common::VERSION
    );

    // Initialize metrics
    if config.observability.metrics_port != 0 {
        let metrics_addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(metrics_addr)
            .set_buckets(metrics::LATENCY_BUCKETS)?
            .install()?;
        info!("Prometheus exporter listening on {}", metrics_addr);
    }
    metrics::register_metrics();

    let addr = format!("{}:{}", config.server.host, config.server.port);

    let state = AppState::from_config(config).map_err(|e| {
        tracing::error!(error = %e, "Failed to initialize collaborators");
        e
    })?;

    info!(
        source = state.explorer.source_name(),
        chat = state.chat.provider(),
        "Collaborators ready"
    );

    // Build the router
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

fn init_tracing(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    if config.json_logging {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let static_files = ServeDir::new(&state.config.server.static_dir);
    let request_timeout = state.config.request_timeout();

    // API routes
    let api_routes = Router::new()
        .route("/search", get(handlers::search::search))
        .route("/graph", post(handlers::graph::graph))
        .route("/chat", post(handlers::chat::chat));

    // Compose the app
    Router::new()
        // Health endpoints
        .route("/health", get(handlers::health::health))
        .route("/ready", get(handlers::health::ready))
        .nest("/api", api_routes)
        .route_layer(axum::middleware::from_fn(middleware::metrics::track_requests))
        .fallback_service(static_files)
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_service_error))
                .layer(TimeoutLayer::new(request_timeout)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(propagate_id)
        .layer(request_id)
        .with_state(state)
}

/// Turn middleware failures into the standard error body
async fn handle_service_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        AppError::UpstreamTimeout {
            service: "request".to_string(),
        }
    } else {
        AppError::Internal {
            message: format!("Unhandled middleware error: {}", err),
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
