//! Crawl counters
//!
//! - `DiscoveredCounter`: how many nodes have been scheduled, readable at any
//!   time for progress reporting
//! - `PendingWork`: how many scheduled fetch tasks have not yet retired; the
//!   crawl is complete when it returns to zero

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

/// Monotonic count of discovered nodes, shared by cloning
#[derive(Debug, Clone, Default)]
pub struct DiscoveredCounter {
    count: Arc<AtomicU64>,
}

impl DiscoveredCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one more discovered node
    pub fn inc(&self) {
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    /// Current count; never blocks producers
    pub fn value(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

/// Outstanding fetch tasks with a wait-for-zero primitive
///
/// `add` must happen before the task that discovered the new work calls
/// `done` for itself, otherwise the count can touch zero early.
#[derive(Debug, Default)]
pub struct PendingWork {
    count: AtomicUsize,
    zero: Notify,
}

impl PendingWork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one scheduled task
    pub fn add(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Retires one task, waking waiters if it was the last
    pub fn done(&self) {
        let previous = self.count.fetch_sub(1, Ordering::SeqCst);
        debug_assert!(previous > 0, "PendingWork::done called more times than add");
        if previous == 1 {
            self.zero.notify_waiters();
        }
    }

    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Resolves once no scheduled task is outstanding
    pub async fn wait_zero(&self) {
        loop {
            // Register before checking so a `done` racing with the load is not missed.
            let notified = self.zero.notified();
            if self.get() == 0 {
                return;
            }
            notified.await;
        }
    }
}
