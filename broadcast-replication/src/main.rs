use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use broadcast_replication::{
    cli::Cli,
    server::{AppState, Server},
};

/// Node logs at `info` and per-request traces at `debug` unless `RUST_LOG` says otherwise.
const DEFAULT_LOG_FILTER: &str = "broadcast_replication=info,broadcast_node=info,tower_http=debug";

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_ids(true)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = Cli::parse().into_config();

    let state = AppState::with_http_peers(&config.peers, config.peer_timeout)
        .context("failed to build replication client")?;
    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("could not listen on {}", config.listen))?;

    let server = Server::new(listener, state);
    let addr = server.local_addr()?;
    info!(peers = ?config.peers, "listening on {}", addr);

    if let Err(err) = server.run_until_ctrl_c().await {
        warn!("server exited with error: {err:?}");
        return Err(err);
    }

    Ok(())
}
