//! Mesh-Walker: a radio mesh topology crawler
//!
//! This crate walks an AREDN-style mesh network starting from one well-known
//! node, fetching every reachable node's `sysinfo.json` and following the host
//! lists they report, then assembles the results into a single mapping dataset.

pub mod config;
pub mod crawler;
pub mod output;
pub mod status;

use thiserror::Error;

/// Main error type for Mesh-Walker operations
#[derive(Debug, Error)]
pub enum WalkerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("Output error: {0}")]
    Output(#[from] output::OutputError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Errors raised while fetching a single node's status
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {node} after {attempts} attempt(s): {source}")]
    Transport {
        node: String,
        attempts: u32,
        source: reqwest::Error,
    },

    #[error("Received HTTP {status} from {node} after {attempts} attempt(s)")]
    Status {
        node: String,
        status: u16,
        attempts: u32,
    },

    #[error("Malformed status body from {node}: {source}")]
    Decode {
        node: String,
        source: serde_json::Error,
    },

    #[error("Invalid status URL for {node}: {message}")]
    InvalidUrl { node: String, message: String },
}

impl FetchError {
    /// Returns true if repeating the request could change the outcome
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Status { .. })
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Mesh-Walker operations
pub type Result<T> = std::result::Result<T, WalkerError>;

/// Result type alias for a single node fetch
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{FetchClient, WalkHandle, Walker};
pub use status::{LinkInfo, LinkType, NodeStatus};

use output::{Assembler, CrawlStats, ProgressReporter, PublishedSummary};
use std::path::Path;
use std::time::Duration;

/// Walks the mesh and publishes the resulting map document
///
/// This is the main entry point for a complete run. It will:
/// 1. Build the fetch client and walker from the configuration
/// 2. Fetch the starting node and start the concurrent walk
/// 3. Log progress while results stream in
/// 4. Tally, relabel and write every result to a scratch file
/// 5. Atomically replace the published document
///
/// # Returns
///
/// * `Ok(PublishedSummary)` - The document was published
/// * `Err(WalkerError)` - The starting node was unreachable or output failed
pub async fn run_walk(config: &Config) -> Result<PublishedSummary> {
    let walker = Walker::from_config(&config.walker)?;
    let mut walk = walker.walk(&config.walker.starting_node).await?;

    let stats = CrawlStats::new();
    let reporter = ProgressReporter::spawn(
        stats.clone(),
        walk.discovered(),
        Duration::from_secs(config.output.progress_interval_secs),
    );

    let mut assembler = Assembler::new(stats)?;
    let drained = assembler.drain(&mut walk).await;
    reporter.stop().await;
    drained?;

    tracing::info!("Finished walking");

    let summary = assembler.finish(walk.discovered().value(), Path::new(&config.output.path))?;
    Ok(summary)
}
