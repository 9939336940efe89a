//! Server Implementation
//!
//! HTTP 服务器启动和优雅关闭

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::oneshot;

use crate::core::{Config, Result, ServerError, ServerState};
use crate::routes::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    /// Create server with initialized state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    pub async fn run(&self) -> Result<()> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("🍬 Sweet Shop API listening on {}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        Self::serve(
            listener,
            self.state.clone(),
            shutdown,
            Duration::from_millis(self.config.shutdown_timeout_ms),
        )
        .await
    }

    /// Serve the app on an already bound listener
    ///
    /// After `shutdown` resolves, in-flight requests get `grace` to finish
    /// before the server task is dropped.
    pub async fn serve(
        listener: TcpListener,
        state: ServerState,
        shutdown: impl Future<Output = ()> + Send + 'static,
        grace: Duration,
    ) -> Result<()> {
        let app = build_app(&state).with_state(state);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = stop_rx.await;
        });
        let mut handle = tokio::spawn(async move { server.await });

        tokio::select! {
            joined = &mut handle => {
                return joined
                    .map_err(|e| ServerError::Internal(e.into()))?
                    .map_err(ServerError::from);
            }
            _ = shutdown => {}
        }

        let _ = stop_tx.send(());
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(joined) => joined
                .map_err(|e| ServerError::Internal(e.into()))?
                .map_err(ServerError::from),
            Err(_) => {
                tracing::warn!(
                    grace_ms = grace.as_millis() as u64,
                    "Graceful shutdown timed out, dropping remaining connections"
                );
                handle.abort();
                Ok(())
            }
        }
    }
}
