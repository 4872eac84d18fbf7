//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::LaunchpadError;
use crate::server::handlers::{
    complete_handler, deploy_loader_handler, health_handler, launch_project_handler,
    oauth_callback_handler, version_handler,
};
use crate::server::state::ServerState;

pub const OAUTH_CALLBACK_PATH: &str = "/oauth/callback";
pub const DEPLOY_PATH: &str = "/build/deploy";
pub const LAUNCH_PROJECT_PATH: &str = "/build/deploy/launch-project";
pub const COMPLETE_PATH: &str = "/build/complete";

/// Build the router with all routes
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Sign-in
        .route(OAUTH_CALLBACK_PATH, get(oauth_callback_handler))
        // Deployment
        .route(DEPLOY_PATH, get(deploy_loader_handler))
        .route(LAUNCH_PROJECT_PATH, post(launch_project_handler))
        .route(COMPLETE_PATH, get(complete_handler))
        // State and middleware
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), LaunchpadError>>, LaunchpadError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| LaunchpadError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| LaunchpadError::ServerError(e.to_string()))
    });

    Ok(handle)
}
