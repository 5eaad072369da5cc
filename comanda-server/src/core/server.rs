//! HTTP server assembly
//!
//! Builds the axum router from the per-resource API modules, applies the
//! authentication middleware at router level (it skips the public paths
//! itself), and serves with graceful shutdown.

use std::net::SocketAddr;
use std::time::Duration;

use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::auth_middleware;
use crate::core::{Config, ServerState};

/// Build the axum router (without state)
pub fn build_app() -> Router<ServerState> {
    Router::<ServerState>::new()
        // Public surface
        .merge(api::health::router())
        .merge(api::auth::router())
        .merge(api::customer::router())
        .merge(api::restaurants::router())
        // Staff surface
        .merge(api::tables::router())
        .merge(api::orders::router())
        .merge(api::kitchen_tickets::router())
        .merge(api::calls::router())
        .merge(api::menu::router())
        .merge(api::staff::router())
        .merge(api::ratings::router())
        .merge(api::activity::router())
}

/// Attach state and middleware, producing the servable router.
pub fn build_router(state: ServerState) -> Router {
    build_app()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

/// HTTP server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create a server over existing state (tests share the state handle)
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    pub async fn run(&self) -> anyhow::Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config)?,
        };
        let app = build_router(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "Comanda server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal(self.config.shutdown_timeout_ms))
            .await?;

        tracing::info!("Server stopped");
        Ok(())
    }
}

/// Resolves on Ctrl-C. Connections then get `timeout_ms` to drain before
/// the process exits anyway.
async fn shutdown_signal(timeout_ms: u64) {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!(timeout_ms, "Shutdown signal received, draining connections");
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(timeout_ms)).await;
        tracing::warn!("Shutdown window elapsed, exiting");
        std::process::exit(0);
    });
}
