use std::net::SocketAddr;
use std::time::Duration;

use secrecy::SecretString;
use serde::Deserialize;

use crate::{health::HealthConfig, static_assets::StaticAssetsConfig};

/// Port the admin server listens on unless configured otherwise
pub const DEFAULT_ADMIN_PORT: u16 = 8001;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_listen_address")]
    pub listen_address: SocketAddr,
    /// How long in-flight requests may take to drain on shutdown (e.g. `10s`)
    #[serde(default = "default_shutdown_timeout")]
    pub shutdown_timeout: String,
    /// Largest request body the admin API will read, in bytes
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
    /// Value admin clients must send in the `X-API-KEY` header
    #[serde(default)]
    pub admin_password: Option<SecretString>,
    #[serde(default)]
    pub health: HealthConfig,
    #[serde(default)]
    pub static_assets: StaticAssetsConfig,
}

impl ServerConfig {
    /// Parsed shutdown drain deadline
    ///
    /// # Errors
    ///
    /// Returns an error if `shutdown_timeout` is not a valid duration string
    pub fn shutdown_timeout(&self) -> anyhow::Result<Duration> {
        duration_str::parse(&self.shutdown_timeout)
            .map_err(|e| anyhow::anyhow!("invalid shutdown_timeout '{}': {e}", self.shutdown_timeout))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            shutdown_timeout: default_shutdown_timeout(),
            max_body_size: default_max_body_size(),
            admin_password: None,
            health: HealthConfig::default(),
            static_assets: StaticAssetsConfig::default(),
        }
    }
}

fn default_listen_address() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], DEFAULT_ADMIN_PORT))
}

fn default_shutdown_timeout() -> String {
    "10s".to_string()
}

const fn default_max_body_size() -> usize {
    4 * 1024 * 1024
}
