//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use tokio::net::TcpListener;

use crate::core::{Config, Result, ServerState};
use crate::services::build_app;

/// HTTP Server
pub struct Server {
    config: Config,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        let port = self.config.http_port;
        let state = ServerState::initialize(self.config).await?;

        let app = build_app(state);
        let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Little Lemon server listening on http://{}", addr);

        let shutdown = async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        };

        axum::serve(
            listener,
            axum::ServiceExt::<axum::extract::Request>::into_make_service(app),
        )
        .with_graceful_shutdown(shutdown)
        .await?;

        Ok(())
    }
}
