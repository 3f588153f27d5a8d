//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the axum Router (two routes behind the origin gate)
//! - Serve plain HTTP or TLS from a pre-bound listener
//! - Drive graceful shutdown: stop accepting, drain in-flight connections,
//!   fail hard when the drain deadline is exceeded

use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::time::Duration;

use axum::middleware::from_fn_with_state;
use axum::{routing::get, Router};
use thiserror::Error;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;

use crate::config::ServiceConfig;
use crate::http::handlers::{self, ServiceInfo};
use crate::http::middleware::origin_gate;
use crate::lifecycle::{Shutdown, SHUTDOWN_DEADLINE};
use crate::net::load_tls_config;

/// Application state injected into handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServiceConfig>,
    pub info: ServiceInfo,
}

/// Error type for server startup and shutdown.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to prepare listener: {0}")]
    Listener(#[source] std::io::Error),

    #[error("failed to load TLS certificate/key: {0}")]
    Tls(#[source] std::io::Error),

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),

    #[error("server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("graceful shutdown did not finish within {0:?}")]
    ShutdownTimeout(Duration),
}

/// Build the axum router with the service's routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root))
        .route("/info", get(handlers::info));
    apply_middleware(routes, state)
}

/// Wrap routes in the service's middleware stack.
///
/// Layer order, outermost first: request timeout, origin gate, panic
/// recovery. The gate therefore logs 404s and recovered 500s, while a
/// tripped deadline never produces an access line.
#[allow(deprecated)]
fn apply_middleware(routes: Router<AppState>, state: AppState) -> Router {
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_secs);

    routes
        .layer(CatchPanicLayer::new())
        .layer(from_fn_with_state(state.clone(), origin_gate))
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: Arc<ServiceConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: Arc<ServiceConfig>, info: ServiceInfo) -> Self {
        let state = AppState {
            config: config.clone(),
            info,
        };
        let router = build_router(state);
        Self { router, config }
    }

    /// Serve on a pre-bound listener until shutdown is requested, then
    /// drain in-flight connections within the fixed deadline.
    ///
    /// Binding is the caller's job, so a bind failure surfaces before any
    /// task spawns. A serve error while no shutdown was requested is fatal.
    pub async fn run(self, listener: TcpListener, shutdown: Shutdown) -> Result<(), ServerError> {
        listener
            .set_nonblocking(true)
            .map_err(ServerError::Listener)?;
        let addr = listener.local_addr().map_err(ServerError::Listener)?;

        let handle = axum_server::Handle::new();
        let make_service = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        let mut serve_task = match &self.config.server.tls {
            Some(tls) => {
                let rustls = load_tls_config(tls).await.map_err(ServerError::Tls)?;
                tracing::info!(address = %addr, tls = true, "server listening");
                tokio::spawn(
                    axum_server::from_tcp_rustls(listener, rustls)
                        .handle(handle.clone())
                        .serve(make_service),
                )
            }
            None => {
                tracing::info!(address = %addr, tls = false, "server listening");
                tokio::spawn(
                    axum_server::from_tcp(listener)
                        .handle(handle.clone())
                        .serve(make_service),
                )
            }
        };

        tokio::select! {
            result = &mut serve_task => {
                return match result {
                    Ok(Ok(())) => Ok(()),
                    Ok(Err(e)) => Err(ServerError::Serve(e)),
                    Err(e) => Err(ServerError::Join(e)),
                };
            }
            _ = shutdown.triggered() => {}
        }

        tracing::info!(deadline = ?SHUTDOWN_DEADLINE, "shutdown requested, draining connections");
        handle.graceful_shutdown(None);

        match tokio::time::timeout(SHUTDOWN_DEADLINE, &mut serve_task).await {
            Ok(Ok(Ok(()))) => {
                tracing::info!("server stopped");
                Ok(())
            }
            Ok(Ok(Err(e))) => Err(ServerError::Serve(e)),
            Ok(Err(e)) => Err(ServerError::Join(e)),
            Err(_) => Err(ServerError::ShutdownTimeout(SHUTDOWN_DEADLINE)),
        }
    }
}
