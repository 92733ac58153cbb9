//! Node status records
//!
//! This module defines the data a mesh node reports about itself through
//! `sysinfo.json`: location, radio, hardware, interfaces, OLSR links, link
//! quality telemetry and the host list used to discover neighbors.
//!
//! # Components
//!
//! - `NodeStatus`: the full record for one node
//! - `LinkInfo` / `LinkType`: per-link OLSR metrics and classification
//! - `decode`: field decoders for the string-encoded values the firmware sends

pub mod decode;
mod types;

pub use types::{Host, Interface, LinkInfo, LinkType, MeshRf, NodeDetails, NodeStatus};
