//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::api;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
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

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl+C, then drain in-flight requests for at most
    /// `shutdown_timeout_ms`.
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let app = api::build_app(&state).with_state(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, "📦 Order server listening");

        let shutdown_started = Arc::new(Notify::new());
        let signal = {
            let shutdown_started = shutdown_started.clone();
            async move {
                let _ = tokio::signal::ctrl_c().await;
                tracing::info!("Shutting down...");
                shutdown_started.notify_one();
            }
        };

        let serve = axum::serve(listener, app)
            .with_graceful_shutdown(signal)
            .into_future();
        let drain_deadline = async {
            shutdown_started.notified().await;
            tokio::time::sleep(Duration::from_millis(self.config.shutdown_timeout_ms)).await;
        };

        tokio::select! {
            result = serve => result?,
            _ = drain_deadline => {
                tracing::warn!(
                    timeout_ms = self.config.shutdown_timeout_ms,
                    "Graceful shutdown timed out, dropping open connections"
                );
            }
        }

        state.pool.close().await;
        tracing::info!("Server stopped");
        Ok(())
    }
}
