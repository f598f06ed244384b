use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;

use crate::propagator::DEFAULT_PEER_TIMEOUT;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run a broadcast-replicated key-value node", long_about = None)]
pub struct Cli {
    /// Port to serve the HTTP API on.
    #[arg(long, default_value_t = 5000)]
    pub port: u16,

    /// Interface to bind to.
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Comma-separated peer addresses, e.g. http://127.0.0.1:3001,http://127.0.0.1:3002
    #[arg(long, value_delimiter = ',')]
    pub cluster: Vec<String>,

    /// Milliseconds to wait for a peer to acknowledge a replicated write.
    #[arg(
        long,
        default_value_t = DEFAULT_PEER_TIMEOUT.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub peer_timeout_ms: u64,
}

/// Startup settings for one node, resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeConfig {
    pub listen: SocketAddr,
    pub peers: Vec<String>,
    pub peer_timeout: Duration,
}

impl Cli {
    pub fn into_config(self) -> NodeConfig {
        let peers = self
            .cluster
            .iter()
            .map(|addr| addr.trim())
            .filter(|addr| !addr.is_empty())
            .map(str::to_string)
            .collect();

        NodeConfig {
            listen: SocketAddr::new(self.host, self.port),
            peers,
            peer_timeout: Duration::from_millis(self.peer_timeout_ms),
        }
    }
}
