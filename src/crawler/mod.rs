//! Crawler module for walking the mesh
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of node status with retry and jitter
//! - Host exclusion rules and visited-node tracking
//! - Dynamic task scheduling and completion detection
//! - Progress counters readable while the walk runs

mod counter;
mod fetcher;
mod hosts;
mod visited;
mod walker;

pub use counter::{DiscoveredCounter, PendingWork};
pub use fetcher::{build_http_client, decode_status, FetchClient, Jitter, RandomJitter};
pub use hosts::{is_excluded_host, normalize_node};
pub use visited::VisitedSet;
pub use walker::{NodeStream, WalkHandle, WalkSettings, Walker};
