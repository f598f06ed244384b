//! Cluster membership and write fan-out.
//!
//! The registry is the only component that knows who the peers are. A
//! broadcast sends one replication attempt to every registered node; what
//! happens to each attempt stays here and never reaches the client.

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::propagator::Propagator;
use crate::stats::{ReplicationStats, StatsSnapshot};

/// A peer replica, identified only by its address.
///
/// The address is fixed at construction; there is no way to change it once
/// the node is registered.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    address: String,
}

impl Node {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }
}

/// Membership operations the coordinator depends on.
#[async_trait]
pub trait NodeRegistry: Send + Sync {
    /// Appends `node` to the membership list and hands it back.
    ///
    /// Duplicate addresses are accepted and will each receive broadcasts.
    fn add_node(&self, node: Node) -> Node;

    /// Returns a copy of the membership list in insertion order.
    fn nodes(&self) -> Vec<Node>;

    /// Sends one replication attempt for `key`/`value` to every known node.
    async fn broadcast(&self, key: &str, value: &str);

    /// Replication counters accumulated by [`NodeRegistry::broadcast`].
    fn stats(&self) -> StatsSnapshot {
        StatsSnapshot::default()
    }
}

/// Lock-guarded membership list that fans writes out through a [`Propagator`].
pub struct Registry {
    nodes: RwLock<Vec<Node>>,
    propagator: Arc<dyn Propagator>,
    stats: ReplicationStats,
}

impl Registry {
    /// Creates a registry with no peers.
    pub fn new(propagator: Arc<dyn Propagator>) -> Self {
        Self {
            nodes: RwLock::new(Vec::new()),
            propagator,
            stats: ReplicationStats::new(),
        }
    }

    /// Creates a registry seeded with `addresses`, skipping blank entries.
    pub fn with_peers<I, S>(propagator: Arc<dyn Propagator>, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::new(propagator);
        for address in addresses {
            let address = address.into();
            let address = address.trim();
            if !address.is_empty() {
                registry.add_node(Node::new(address));
            }
        }
        registry
    }
}

#[async_trait]
impl NodeRegistry for Registry {
    fn add_node(&self, node: Node) -> Node {
        self.nodes
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(node.clone());
        node
    }

    fn nodes(&self) -> Vec<Node> {
        self.nodes
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    async fn broadcast(&self, key: &str, value: &str) {
        // Snapshot first: the lock must not be held across the awaits below.
        let peers = self.nodes();
        self.stats.record_broadcast(peers.len());
        if peers.is_empty() {
            debug!(key, "no peers registered, nothing to replicate");
            return;
        }

        let attempts = peers.iter().map(|node| async move {
            let result = self.propagator.send(key, value, node.address()).await;
            (node, result)
        });

        for (node, result) in join_all(attempts).await {
            match result {
                Ok(()) => {
                    self.stats.record_delivered();
                    debug!(peer = %node.address(), key, "replicated write");
                }
                Err(err) => {
                    self.stats.record_failed();
                    warn!(
                        peer = %node.address(),
                        kind = err.kind(),
                        error = %err,
                        key,
                        "replication attempt failed"
                    );
                }
            }
        }
    }
}
