use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use bookings::config::{load_config, BookingConfig};
use bookings::lifecycle::{shutdown_signal, Shutdown};
use bookings::net::load_tls_config;
use bookings::observability::{logging, metrics};
use bookings::{HttpServer, SqliteRepo};

/// Bed and breakfast booking site.
#[derive(Debug, Parser)]
#[command(name = "bookings", version)]
struct Args {
    /// Path to a TOML configuration file; defaults are used when omitted.
    #[arg(short, long, env = "BOOKINGS_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => BookingConfig::default(),
    };

    logging::init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "bookings starting");
    tracing::info!(
        config_file = ?args.config,
        bind_address = %config.listener.bind_address,
        database = %config.database.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let repo = SqliteRepo::from_config(&config.database).await?;
    tracing::info!(path = %config.database.path, "Reservation store ready");

    let shutdown = Shutdown::new();
    let trigger = shutdown.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        trigger.trigger();
    });

    let tls = config.listener.tls.clone();
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, Arc::new(repo));

    match tls {
        Some(tls) => {
            let addr: SocketAddr = bind_address.parse()?;
            let rustls = load_tls_config(&tls).await?;
            server.run_tls(addr, rustls, &shutdown).await?;
        }
        None => {
            let listener = TcpListener::bind(&bind_address).await?;
            server.run(listener, &shutdown).await?;
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
