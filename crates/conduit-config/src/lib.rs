#![allow(clippy::must_use_candidate)]

mod env;
pub mod health;
mod loader;
pub mod log;
pub mod server;
pub mod static_assets;
pub mod telemetry;

use serde::Deserialize;

pub use health::*;
pub use log::*;
pub use server::*;
pub use static_assets::*;
pub use telemetry::TelemetryConfig;

/// Top-level conduit configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Admin server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Log output configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Telemetry configuration
    #[serde(default)]
    pub telemetry: Option<TelemetryConfig>,
}
