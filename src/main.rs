//! Network State Checker (v1)
//!
//! Synthetic uptime signal for a group of upstream services.
//!
//! # Architecture Overview
//!
//! ```text
//!   ┌──────────────┐
//!   │ ProbeWorker  │──┐
//!   │ (monitor 0)  │  │
//!   └──────────────┘  │    bounded queue     ┌───────────────┐    publish    ┌──────────────┐
//!   ┌──────────────┐  ├──────(cap 10)──────▶│ StateResolver │──────────────▶│ ClusterState │
//!   │ ProbeWorker  │──┤                      │ merge+verdict │   (ArcSwap)   │  snapshot    │
//!   │ (monitor 1)  │  │                      └───────────────┘               └──────┬───────┘
//!   └──────────────┘  │                                                             │ read
//!         ...       ──┘                                                             ▼
//!                                                                          ┌─────────────────┐
//!   Operator / uptime monitor  ◀──── status = health code, JSON body ──────│  HTTP server    │
//!                                                                          └─────────────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;

use network_state_checker::config::loader::load_config;
use network_state_checker::http::HttpServer;
use network_state_checker::lifecycle::{signals, start_checker, Shutdown};
use network_state_checker::net::tls::load_tls_config;
use network_state_checker::observability::{logging, metrics};

const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(15);

#[derive(Parser)]
#[command(name = "network-state-checker", version)]
#[command(about = "Probe upstream targets and serve the aggregated health verdict", long_about = None)]
struct Args {
    /// Path to the configuration file (TOML, or JSON with a .json extension).
    #[arg(short, long, default_value = "check.toml")]
    config: PathBuf,

    /// Override the port of the configured bind address.
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = load_config(&args.config)?;
    let mut addr: SocketAddr = config.listener.bind_address.parse()?;
    if let Some(port) = args.port {
        addr.set_port(port);
        config.listener.bind_address = addr.to_string();
    }

    logging::init_logging(&config.observability);

    tracing::info!("network-state-checker v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        config = %args.config.display(),
        bind_address = %addr,
        tls = config.listener.tls.is_some(),
        servers = config.servers.len(),
        use_cached_results = config.use_cached_results,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(metrics_addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(metrics_addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let checker = start_checker(&config, &shutdown);
    let server = HttpServer::new(checker.snapshots());

    let mut server_task = match &config.listener.tls {
        Some(tls) => {
            let rustls = load_tls_config(tls).await?;
            tokio::spawn(server.run_tls(addr, rustls, shutdown.subscribe()))
        }
        None => {
            let listener = TcpListener::bind(addr).await?;
            tokio::spawn(server.run(listener, shutdown.subscribe()))
        }
    };

    tokio::select! {
        res = signals::wait_for_signal() => res?,
        res = &mut server_task => {
            tracing::error!(result = ?res, "HTTP server exited unexpectedly");
        }
    }

    tracing::info!("Stopping network state checker");
    shutdown.trigger();

    if shutdown.drain(SHUTDOWN_DEADLINE).await {
        if let Some(state) = checker.join().await {
            tracing::info!(health_code = state.health_code, "Final cluster state");
        }
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
