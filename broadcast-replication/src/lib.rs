//! Key-value store replicated by HTTP broadcast.
//!
//! Every node keeps its own in-memory map and a list of peers. A client write
//! is applied locally and then sent once to every peer; a peer applies what it
//! receives without forwarding it again. There is no leader, no log, and no
//! retry: a peer that is down simply misses the write.
//!
//! # Modules
//!
//! - [`store`]: thread-safe in-memory key-value storage
//! - [`registry`]: cluster membership and write fan-out
//! - [`propagator`]: one outbound replication attempt over HTTP
//! - [`server`]: axum routes and the server lifecycle
//! - [`protocol`]: JSON request and replication bodies
//! - [`stats`]: replication counters served from `/stats`
//! - [`error`]: propagation and request errors
//! - [`cli`]: command-line configuration

pub mod cli;
pub mod error;
pub mod propagator;
pub mod protocol;
pub mod registry;
pub mod server;
pub mod stats;
pub mod store;
