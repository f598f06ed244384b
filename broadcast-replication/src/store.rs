//! In-memory key-value storage for a single node.
//!
//! Every node owns one store. Client writes and replicated writes from peers
//! both land here; reads never leave the node.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Local key-value map the coordinator reads from and writes to.
///
/// Implementations must be safe to call from any request task at once.
pub trait ItemStore: Send + Sync {
    /// Stores a value, overwriting whatever was there, and returns the stored value.
    fn set(&self, key: String, value: String) -> String;

    /// Returns the current value for `key`, or `None` when it was never written.
    fn get(&self, key: &str) -> Option<String>;
}

/// Thread-safe key-value store backed by a `HashMap`.
///
/// # Why RwLock instead of Mutex?
///
/// Reads are served locally on every `GET /items/{key}` and never contend
/// with each other, so they share the read lock. Writes (client `PUT`s and
/// replicated messages) take the write lock for the duration of one insert,
/// which keeps every key linearizable.
///
/// A poisoned lock is recovered rather than propagated: a single insert
/// cannot leave the map half-written, so the data behind it is still valid.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ItemStore for MemoryStore {
    fn set(&self, key: String, value: String) -> String {
        let mut items = self.items.write().unwrap_or_else(PoisonError::into_inner);
        items.insert(key, value.clone());
        value
    }

    fn get(&self, key: &str) -> Option<String> {
        self.items
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}
