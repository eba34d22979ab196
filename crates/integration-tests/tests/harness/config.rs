//! Programmatic configuration builder for integration tests

use std::net::SocketAddr;
use std::path::Path;

use conduit_config::{Config, ServerConfig, StaticAssetsConfig};
use secrecy::SecretString;

/// Builder for constructing test configurations
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with minimal defaults
    ///
    /// Listens on an ephemeral loopback port with static assets off.
    pub fn new() -> Self {
        Self {
            config: Config {
                server: ServerConfig {
                    listen_address: SocketAddr::from(([127, 0, 0, 1], 0)),
                    static_assets: StaticAssetsConfig {
                        enabled: false,
                        ..StaticAssetsConfig::default()
                    },
                    ..ServerConfig::default()
                },
                ..Config::default()
            },
        }
    }

    /// Require `X-API-KEY` on admin requests
    pub fn with_admin_password(mut self, password: &str) -> Self {
        self.config.server.admin_password = Some(SecretString::from(password.to_owned()));
        self
    }

    /// Serve documentation assets from `root`
    pub fn with_static_root(mut self, root: &Path) -> Self {
        self.config.server.static_assets = StaticAssetsConfig {
            enabled: true,
            root: root.to_path_buf(),
            max_age: 60,
        };
        self
    }

    pub fn with_max_body_size(mut self, bytes: usize) -> Self {
        self.config.server.max_body_size = bytes;
        self
    }

    /// Disable health endpoint
    pub fn without_health(mut self) -> Self {
        self.config.server.health.enabled = false;
        self
    }

    /// Build the final config
    pub fn build(self) -> Config {
        self.config
    }
}
