//! Output module for turning walk results into the published map
//!
//! This module handles:
//! - Tallying mapped, unmapped, and failed nodes
//! - Logging progress while the walk runs
//! - Relabeling supernode links and writing the final JSON document

mod assemble;
mod progress;
pub mod stats;

pub use assemble::{relabel_supernode_links, Assembler, PublishedSummary};
pub use progress::ProgressReporter;
pub use stats::{print_statistics, CrawlStats, StatsSnapshot};

use thiserror::Error;

/// Errors that can occur while assembling output
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
