use std::path::PathBuf;

use clap::Parser;

/// Conduit admin control plane
#[derive(Debug, Parser)]
#[command(name = "conduit", about = "Admin API for managing gateway keys, routes, policies, and usage reports")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "conduit.toml", env = "CONDUIT_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "CONDUIT_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
