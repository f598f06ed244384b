//! Replication counters.
//!
//! Broadcast failures never reach the client, so these counters (and the
//! warnings logged next to them) are how an operator notices a peer that has
//! stopped receiving writes. They are served from `GET /stats`.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Debug, Default)]
pub struct ReplicationStats {
    broadcasts: AtomicU64,
    attempts: AtomicU64,
    delivered: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time copy of [`ReplicationStats`].
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub broadcasts: u64,
    pub attempts: u64,
    pub delivered: u64,
    pub failed: u64,
}

impl ReplicationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_broadcast(&self, peers: usize) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
        self.attempts.fetch_add(peers as u64, Ordering::Relaxed);
    }

    pub(crate) fn record_delivered(&self) {
        self.delivered.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            broadcasts: self.broadcasts.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            delivered: self.delivered.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_recorded_outcomes() {
        let stats = ReplicationStats::new();
        stats.record_broadcast(3);
        stats.record_delivered();
        stats.record_delivered();
        stats.record_failed();

        assert_eq!(
            stats.snapshot(),
            StatsSnapshot {
                broadcasts: 1,
                attempts: 3,
                delivered: 2,
                failed: 1,
            }
        );
    }
}
