mod auth;
mod classify;
mod decode;
mod endpoint;
mod error;
mod handlers;
mod health;
mod problem;
mod request_context;
mod router;
mod state;
mod static_assets;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use conduit_config::Config;
use conduit_core::Managers;
use conduit_telemetry::{MetricsSink, Recorder};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use auth::ADMIN_KEY_HEADER;
pub use error::ServerError;
pub use problem::ProblemResponse;
pub use state::AdminState;

/// Assembled admin server with all routes and middleware
pub struct AdminServer {
    router: Router,
    listen_address: SocketAddr,
}

impl AdminServer {
    /// Build the server from configuration and the process-wide managers
    ///
    /// # Errors
    ///
    /// Returns an error if the configured routes collide
    pub fn new(config: &Config, managers: Managers, sink: Arc<dyn MetricsSink>) -> Result<Self, ServerError> {
        let state = AdminState {
            managers,
            recorder: Recorder::new(config.metrics_namespace(), sink),
            redaction: config.log.redaction,
            body_limit: config.server.max_body_size,
        };

        Ok(Self {
            router: router::build_router(state, &config.server)?,
            listen_address: config.server.listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the configured listen address
    #[must_use]
    pub const fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Bind the listener and start serving in a background task
    ///
    /// # Errors
    ///
    /// Returns an error if the listen address cannot be bound
    pub async fn start(self) -> Result<RunningServer, ServerError> {
        let address = self.listen_address;
        let bind_error = |source| ServerError::Bind { address, source };

        let listener = tokio::net::TcpListener::bind(address).await.map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;
        tracing::info!(%local_addr, "admin server listening");

        let shutdown = CancellationToken::new();
        let signal = shutdown.clone();

        let task = tokio::spawn(async move {
            axum::serve(listener, self.router)
                .with_graceful_shutdown(async move {
                    signal.cancelled().await;
                    tracing::info!("graceful shutdown initiated");
                })
                .await
        });

        Ok(RunningServer {
            local_addr,
            shutdown,
            task,
        })
    }
}

/// Handle to a serving admin server
pub struct RunningServer {
    local_addr: SocketAddr,
    shutdown: CancellationToken,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Address the listener is actually bound to
    #[must_use]
    pub const fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for in-flight requests
    ///
    /// Requests still running after `deadline` are aborted.
    ///
    /// # Errors
    ///
    /// Returns an error if serving failed or the deadline was exceeded
    pub async fn shutdown(mut self, deadline: Duration) -> Result<(), ServerError> {
        self.shutdown.cancel();

        match tokio::time::timeout(deadline, &mut self.task).await {
            Ok(joined) => {
                joined??;
                tracing::info!("admin server stopped");
                Ok(())
            }
            Err(_) => {
                self.task.abort();
                tracing::warn!(?deadline, "admin server did not drain in time");
                Err(ServerError::ShutdownTimeout(deadline))
            }
        }
    }
}
