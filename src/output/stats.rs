//! Running tallies of a walk as seen by the consumer
//!
//! The assembler updates these while draining the result stream and the
//! progress reporter samples them concurrently.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Tallies {
    completed: AtomicU64,
    unmapped: AtomicU64,
    failed: AtomicU64,
}

/// Shared, lock-free crawl statistics
#[derive(Debug, Clone, Default)]
pub struct CrawlStats {
    inner: Arc<Tallies>,
}

/// Point-in-time copy of `CrawlStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    /// Results received from the stream, successful or not
    pub completed: u64,

    /// Nodes fetched successfully but without coordinates
    pub unmapped: u64,

    /// Nodes that failed every fetch attempt
    pub failed: u64,
}

impl StatsSnapshot {
    /// Nodes written to the map
    pub fn mapped(&self) -> u64 {
        self.completed - self.unmapped - self.failed
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_mapped(&self) {
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unmapped(&self) {
        self.inner.unmapped.fetch_add(1, Ordering::Relaxed);
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.inner.failed.fetch_add(1, Ordering::Relaxed);
        self.inner.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        // Sub-counts first so `completed` is never smaller than their sum.
        let unmapped = self.inner.unmapped.load(Ordering::Relaxed);
        let failed = self.inner.failed.load(Ordering::Relaxed);
        let completed = self.inner.completed.load(Ordering::Relaxed);
        StatsSnapshot {
            completed: completed.max(unmapped + failed),
            unmapped,
            failed,
        }
    }
}

/// Prints the end-of-walk summary to stdout
///
/// # Arguments
///
/// * `stats` - Final tallies from the assembler
/// * `discovered` - Nodes scheduled by the walker, excluding the starting node
pub fn print_statistics(stats: &StatsSnapshot, discovered: u64) {
    println!("=== Walk Statistics ===\n");

    println!("Overview:");
    println!("  Nodes discovered: {}", discovered);
    println!("  Results received: {}", stats.completed);
    println!("  Mapped: {}", stats.mapped());
    println!("  Unmapped (no coordinates): {}", stats.unmapped);
    println!("  Failed (unreachable): {}", stats.failed);
    println!();

    let mapped_rate = if stats.completed > 0 {
        (stats.mapped() as f64 / stats.completed as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Map Coverage: {:.1}% ({} / {} nodes placed on the map)",
        mapped_rate,
        stats.mapped(),
        stats.completed
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_counts() {
        let stats = CrawlStats::new();
        stats.record_mapped();
        stats.record_mapped();
        stats.record_unmapped();
        stats.record_failed();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.completed, 4);
        assert_eq!(snapshot.mapped(), 2);
        assert_eq!(snapshot.unmapped, 1);
        assert_eq!(snapshot.failed, 1);
    }

    #[test]
    fn test_clones_share_tallies() {
        let stats = CrawlStats::new();
        let reader = stats.clone();
        stats.record_failed();
        assert_eq!(reader.snapshot().failed, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = CrawlStats::new().snapshot();
        assert_eq!(snapshot, StatsSnapshot::default());
        assert_eq!(snapshot.mapped(), 0);
    }
}
