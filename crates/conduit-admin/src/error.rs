use std::net::SocketAddr;
use std::time::Duration;

/// Failures of the admin server lifecycle
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to bind admin listener on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("admin server stopped with an error: {0}")]
    Serve(#[from] std::io::Error),

    #[error("admin server task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("health path {0} is already taken by an admin route")]
    RouteConflict(String),

    #[error("in-flight requests did not drain within {0:?}")]
    ShutdownTimeout(Duration),
}
