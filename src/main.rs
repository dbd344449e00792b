//! Switchyard server binary.
//!
//! Loads a TOML configuration, registers the built-in and configured routes
//! and serves them until Ctrl+C or SIGTERM.

use std::path::PathBuf;

use clap::Parser;

use switchyard::config::{self, routes::register_routes, ServerConfig};
use switchyard::http::error_page::ErrorPage;
use switchyard::lifecycle::{signals, Shutdown};
use switchyard::observability::{logging, metrics};
use switchyard::{ListenOptions, PathFilter, Router, Routes, Server, SocketListener};

#[derive(Parser)]
#[command(name = "switchyard")]
#[command(about = "Request router with middleware and error pipelines", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener host
    #[arg(long)]
    host: Option<String>,

    /// Override the listener port
    #[arg(short, long)]
    port: Option<u16>,

    /// Validate the configuration and exit
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => ServerConfig::default(),
    };
    if cli.check {
        println!("configuration ok");
        return Ok(());
    }

    logging::init(&config.observability);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "switchyard starting");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = Router::with_guard(config.router.guard_unhandled);
    let server = Server::with_router(router, SocketListener::new(config.listener.clone()));

    if config.well_known.time {
        switchyard::well_known::register_time(&server);
    }
    register_routes(&server, &config.routes)?;
    if config.router.error_pages {
        server.use_error(PathFilter::Any, ErrorPage);
    }

    let shutdown = Shutdown::new();
    signals::trigger_on_signal(shutdown.clone());

    let mut options = ListenOptions::new().abort_on(shutdown.subscribe());
    if let Some(host) = cli.host {
        options = options.host(host);
    }
    if let Some(port) = cli.port {
        options = options.port(port);
    }

    let listening = server.listen(options).await?;
    listening.wait().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
