//! Periodic progress logging while a walk runs

use crate::crawler::DiscoveredCounter;
use crate::output::stats::CrawlStats;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Background task that logs crawl progress at a fixed interval
pub struct ProgressReporter {
    handle: JoinHandle<()>,
}

impl ProgressReporter {
    /// Starts logging every `every` until [`ProgressReporter::stop`] is called
    pub fn spawn(stats: CrawlStats, discovered: DiscoveredCounter, every: Duration) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let snapshot = stats.snapshot();
                tracing::info!(
                    "Still walking: completed={} total={} mapped={} unmapped={} failed={}",
                    snapshot.completed,
                    discovered.value(),
                    snapshot.mapped(),
                    snapshot.unmapped,
                    snapshot.failed
                );
            }
        });

        Self { handle }
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }

    /// Stops the reporter and waits for it to exit
    pub async fn stop(self) {
        self.handle.abort();
        let _ = self.handle.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reporter_runs_until_stopped() {
        let reporter = ProgressReporter::spawn(
            CrawlStats::new(),
            DiscoveredCounter::new(),
            Duration::from_millis(10),
        );

        tokio::time::sleep(Duration::from_millis(35)).await;
        assert!(reporter.is_running());

        tokio::time::timeout(Duration::from_secs(1), reporter.stop())
            .await
            .expect("stop should not hang");
    }
}
