//! Set of node identifiers that have already been scheduled
//!
//! Every operation takes the same lock, so `check_or_insert` is a single atomic
//! step. The walker only ever goes through `check_or_insert`; the other
//! accessors exist for inspection and tests.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct VisitedSet {
    nodes: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        self.nodes.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns true if `key` was already present, otherwise inserts it and returns false
    pub fn check_or_insert(&self, key: &str) -> bool {
        let mut nodes = self.lock();
        if nodes.contains(key) {
            return true;
        }
        nodes.insert(key.to_string());
        false
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains(key)
    }

    /// Inserts `key`, returning true if it was not present before
    pub fn insert(&self, key: &str) -> bool {
        self.lock().insert(key.to_string())
    }

    /// Removes `key`, returning true if it was present
    pub fn remove(&self, key: &str) -> bool {
        self.lock().remove(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
