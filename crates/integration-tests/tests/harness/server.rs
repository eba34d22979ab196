//! Test server wrapper that starts conduit on a random port

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use conduit_admin::{AdminServer, RunningServer};
use conduit_config::Config;
use conduit_store::{InMemory, MemoryReporting};
use conduit_telemetry::NoopSink;

/// A running test server instance backed by in-memory managers
pub struct TestServer {
    running: RunningServer,
    reporting: Arc<MemoryReporting>,
    client: reqwest::Client,
}

impl TestServer {
    /// Start a test server with the given configuration
    pub async fn start(config: Config) -> anyhow::Result<Self> {
        let store = InMemory::new();
        let running = AdminServer::new(&config, store.managers, Arc::new(NoopSink))?.start().await?;

        Ok(Self {
            running,
            reporting: store.reporting,
            client: reqwest::Client::new(),
        })
    }

    /// Base URL of the running test server
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.running.local_addr())
    }

    /// Get a reference to the HTTP client
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Event log behind the reporting endpoints
    pub fn reporting(&self) -> &MemoryReporting {
        &self.reporting
    }

    /// Server address
    pub fn addr(&self) -> SocketAddr {
        self.running.local_addr()
    }

    /// Drain and stop the server
    pub async fn stop(self) -> anyhow::Result<()> {
        self.running.shutdown(Duration::from_secs(5)).await?;
        Ok(())
    }
}
