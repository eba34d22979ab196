#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod args;

use std::sync::Arc;

use anyhow::Context;
use args::Args;
use clap::Parser;
use conduit_admin::AdminServer;
use conduit_config::Config;
use conduit_store::InMemory;
use conduit_telemetry::OtelSink;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;
    let shutdown_timeout = config.server.shutdown_timeout()?;

    // Initialize telemetry
    let telemetry = conduit_telemetry::init(config.telemetry.as_ref(), &config.log)?;

    tracing::info!(
        config_path = %args.config.display(),
        exporting = telemetry.is_exporting(),
        "starting conduit"
    );

    // Build server
    let store = InMemory::new();
    let mut server = AdminServer::new(&config, store.managers, Arc::new(OtelSink::global()))
        .context("failed to build admin server")?;
    if let Some(listen) = args.listen {
        server = server.with_listen_address(listen);
    }

    let running = server.start().await.context("failed to start admin server")?;

    shutdown_signal().await;

    running
        .shutdown(shutdown_timeout)
        .await
        .context("admin server did not shut down cleanly")?;

    if let Err(e) = telemetry.force_flush() {
        tracing::warn!(error = %e, "telemetry flush failed");
    }
    tracing::info!("conduit stopped");
    Ok(())
}

/// Wait for a shutdown signal (`SIGINT` or `SIGTERM`)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }

    tracing::info!("shutdown signal received");
}
