use anyhow::Result;
use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::{
    config::Config,
    cors::{cors_middleware, preflight},
    handlers::{self, chat::AppState},
    metrics,
    signals::setup_signal_handlers,
};

/// Start the relay server
///
/// This function:
/// 1. Initializes metrics
/// 2. Sets up signal handlers for graceful shutdown and config reload
/// 3. Creates the Axum application
/// 4. Binds to the configured address
/// 5. Serves requests with graceful shutdown support
pub async fn start_server(config: Config, config_path: PathBuf) -> Result<()> {
    let metrics_handle = if config.metrics.enabled {
        info!("Initializing Prometheus metrics...");
        Some(Arc::new(metrics::init_metrics()?))
    } else {
        None
    };

    // Wrap config in ArcSwap for atomic reload support
    let config_swap = Arc::new(ArcSwap::from_pointee(config.clone()));

    // Setup signal handlers (SIGTERM, SIGINT for shutdown; SIGHUP for reload)
    let (shutdown_tx, signal_handle) = setup_signal_handlers(config_swap.clone(), config_path);
    let mut shutdown_rx = shutdown_tx.subscribe();

    let app_state = AppState {
        config: config_swap,
        http_client: reqwest::Client::new(),
    };

    let app = create_router(app_state, metrics_handle);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    info!("Starting Kea relay on {}", addr);
    if let Err(e) = config.relay.resolve() {
        warn!("Relay is not fully configured, chat requests will fail: {}", e);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
            info!("Shutdown signal received, draining connections...");
        })
        .await?;

    signal_handle.await?;
    info!("Server stopped gracefully");

    Ok(())
}

/// Create the Axum router with all routes and middleware
///
/// Every route answers OPTIONS with an empty 204; the CORS middleware adds
/// the policy headers to all routed responses.
pub fn create_router(app_state: AppState, metrics_handle: Option<Arc<PrometheusHandle>>) -> Router {
    let metrics_endpoint = app_state.config.load().metrics.endpoint.clone();

    let mut app: Router = Router::new()
        .route(
            "/kea/v1/chat",
            post(handlers::chat::handle_chat).options(preflight),
        )
        .route(
            "/kea/v1/manifest",
            get(handlers::manifest::get_manifest).options(preflight),
        )
        .route(
            "/kea/manifest",
            get(handlers::manifest::get_manifest).options(preflight),
        )
        .route(
            "/kea/v1/provider",
            get(handlers::provider::get_provider).options(preflight),
        )
        .route("/", get(handlers::home::home).options(preflight))
        .route("/kea", get(handlers::home::home).options(preflight))
        .route("/kea/v1", get(handlers::home::home).options(preflight))
        .route("/health", get(handlers::health::health_check).options(preflight))
        .route("/ready", get(handlers::health::readiness_check).options(preflight))
        .with_state(app_state);

    if let Some(handle) = metrics_handle {
        let metrics_routes: Router = Router::new()
            .route(
                &metrics_endpoint,
                get(handlers::metrics_handler::metrics).options(preflight),
            )
            .with_state(handle);
        app = app.merge(metrics_routes);
    }

    app.layer(middleware::from_fn(cors_middleware))
        // Limit request body size to 10MB
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
}
