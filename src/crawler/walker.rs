//! Walker - concurrent mesh crawl with counting-based completion
//!
//! The starting node is fetched inline. Every host it reports that passes the
//! exclusion rules and has not been seen yet is registered as pending work and
//! handed to a dispatch loop, which spawns one task per node. Each task fetches
//! its node, schedules that node's unseen neighbors the same way, pushes its
//! result onto the output stream and only then retires its pending-work slot.
//!
//! Because a task's children are registered before the task retires itself,
//! the pending count can only reach zero once the whole reachable graph has
//! been fetched. At that point the dispatcher stops accepting work and the
//! stream closes as soon as the last sender is dropped.

use crate::config::WalkerConfig;
use crate::crawler::counter::{DiscoveredCounter, PendingWork};
use crate::crawler::fetcher::FetchClient;
use crate::crawler::hosts::{is_excluded_host, normalize_node};
use crate::crawler::visited::VisitedSet;
use crate::status::NodeStatus;
use crate::FetchResult;
use std::sync::Arc;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore};

/// Stream of per-node results; `None` marks a node whose fetch failed
pub type NodeStream = mpsc::Receiver<Option<NodeStatus>>;

/// Scheduling limits for one walk
#[derive(Debug, Clone)]
pub struct WalkSettings {
    /// Maximum number of node fetches in flight; 0 means unbounded
    pub max_concurrent: usize,

    /// Capacity of the output stream; producers wait when it is full
    pub channel_capacity: usize,
}

impl Default for WalkSettings {
    fn default() -> Self {
        Self {
            max_concurrent: 0,
            channel_capacity: 1,
        }
    }
}

impl From<&WalkerConfig> for WalkSettings {
    fn from(config: &WalkerConfig) -> Self {
        Self {
            max_concurrent: config.max_concurrent,
            channel_capacity: config.channel_capacity,
        }
    }
}

/// A node waiting in the dispatch queue
#[derive(Debug)]
struct ScheduledVisit {
    node: String,
}

/// State shared by every task of one walk
struct Crawl {
    client: FetchClient,
    visited: VisitedSet,
    discovered: DiscoveredCounter,
    pending: PendingWork,
    tasks: mpsc::UnboundedSender<ScheduledVisit>,
}

impl Crawl {
    /// Fetches `node` and schedules every neighbor not seen before
    async fn visit(&self, node: &str) -> FetchResult<NodeStatus> {
        let status = self.client.get(node).await?;

        for host in status.host_names() {
            if is_excluded_host(host) {
                tracing::trace!("Skipping {} reported by {}", host, node);
                continue;
            }

            if self.visited.check_or_insert(&normalize_node(host)) {
                continue;
            }

            self.pending.add();
            self.discovered.inc();
            tracing::debug!("Discovered {} via {}", host, node);

            let scheduled = ScheduledVisit {
                node: host.to_string(),
            };
            if self.tasks.send(scheduled).is_err() {
                // Only reachable if the dispatcher is gone, which requires zero pending work.
                tracing::warn!("Dispatcher closed before {} could be scheduled", host);
                self.pending.done();
            }
        }

        Ok(status)
    }
}

/// A running walk: the result stream plus a live discovered-node count
pub struct WalkHandle {
    results: NodeStream,
    discovered: DiscoveredCounter,
}

impl WalkHandle {
    /// Receives the next result
    ///
    /// Returns `None` once the walk is complete. `Some(None)` is a node that
    /// was scheduled but failed every fetch attempt.
    pub async fn next(&mut self) -> Option<Option<NodeStatus>> {
        self.results.recv().await
    }

    /// Counter of nodes scheduled so far, excluding the starting node
    pub fn discovered(&self) -> DiscoveredCounter {
        self.discovered.clone()
    }
}

/// Crawls a mesh from a starting node
///
/// A `Walker` can run any number of independent walks; each call to
/// [`Walker::walk`] gets its own visited set and counters.
#[derive(Debug, Clone)]
pub struct Walker {
    client: FetchClient,
    settings: WalkSettings,
}

impl Walker {
    pub fn new(client: FetchClient, settings: WalkSettings) -> Self {
        Self { client, settings }
    }

    /// Builds a walker and its fetch client from configuration
    pub fn from_config(config: &WalkerConfig) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            FetchClient::from_config(config)?,
            WalkSettings::from(config),
        ))
    }

    /// Starts a walk at `starting_node`
    ///
    /// The starting node is fetched before this returns and its status is the
    /// first item on the stream. Failing to fetch it is the only error; every
    /// later failure is reported as a `None` item and prunes that branch.
    pub async fn walk(&self, starting_node: &str) -> FetchResult<WalkHandle> {
        let (task_tx, task_rx) = mpsc::unbounded_channel();
        let (result_tx, result_rx) = mpsc::channel(self.settings.channel_capacity.max(1));

        let crawl = Arc::new(Crawl {
            client: self.client.clone(),
            visited: VisitedSet::new(),
            discovered: DiscoveredCounter::new(),
            pending: PendingWork::new(),
            tasks: task_tx,
        });

        crawl.visited.insert(&normalize_node(starting_node));

        tracing::info!("Starting walk at {}", starting_node);
        let status = crawl.visit(starting_node).await?;

        // Nothing else can send before the dispatcher runs, so this never waits.
        if result_tx.send(Some(status)).await.is_err() {
            tracing::debug!("Result stream dropped before {} was reported", starting_node);
        }

        let limiter = match self.settings.max_concurrent {
            0 => None,
            n => Some(Arc::new(Semaphore::new(n))),
        };

        let discovered = crawl.discovered.clone();
        tokio::spawn(dispatch(crawl, task_rx, result_tx, limiter));

        Ok(WalkHandle {
            results: result_rx,
            discovered,
        })
    }
}

/// Launches scheduled visits until no work is pending
async fn dispatch(
    crawl: Arc<Crawl>,
    mut tasks: mpsc::UnboundedReceiver<ScheduledVisit>,
    results: mpsc::Sender<Option<NodeStatus>>,
    limiter: Option<Arc<Semaphore>>,
) {
    let mut launched: u64 = 0;

    loop {
        tokio::select! {
            biased;

            Some(task) = tasks.recv() => {
                let permit = match &limiter {
                    Some(semaphore) => semaphore.clone().acquire_owned().await.ok(),
                    None => None,
                };
                launched += 1;
                tokio::spawn(run_visit(crawl.clone(), task, results.clone(), permit));
            }

            _ = crawl.pending.wait_zero() => break,
        }
    }

    tasks.close();
    tracing::info!(
        "Walk complete: {} nodes launched, {} discovered",
        launched,
        crawl.discovered.value()
    );
}

/// Runs one scheduled visit and reports its outcome
async fn run_visit(
    crawl: Arc<Crawl>,
    task: ScheduledVisit,
    results: mpsc::Sender<Option<NodeStatus>>,
    permit: Option<OwnedSemaphorePermit>,
) {
    let outcome = match crawl.visit(&task.node).await {
        Ok(status) => Some(status),
        Err(e) => {
            tracing::error!("Error fetching {}: {}", task.node, e);
            None
        }
    };
    drop(permit);

    if results.send(outcome).await.is_err() {
        tracing::debug!("Result stream dropped; discarding {}", task.node);
    }

    crawl.pending.done();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_settings_from_config() {
        let config = WalkerConfig {
            max_concurrent: 8,
            channel_capacity: 32,
            ..WalkerConfig::default()
        };
        let settings = WalkSettings::from(&config);
        assert_eq!(settings.max_concurrent, 8);
        assert_eq!(settings.channel_capacity, 32);
    }

    #[tokio::test]
    async fn test_unreachable_start_node_is_an_error() {
        // Port 9 (discard) on localhost refuses connections.
        let client = FetchClient::new(
            Duration::from_millis(500),
            1,
            Duration::ZERO,
            "http://127.0.0.1:9/{node}/sysinfo.json",
        )
        .unwrap();
        let walker = Walker::new(client, WalkSettings::default());

        assert!(walker.walk("N0CALL").await.is_err());
    }
}
