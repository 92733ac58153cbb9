//! Configuration module for Mesh-Walker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; a missing file section falls back to the defaults the
//! public mesh map has always been generated with.
//!
//! # Example
//!
//! ```no_run
//! use mesh_walker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("walker.toml")).unwrap();
//! println!("Walk starts at: {}", config.walker.starting_node);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, WalkerConfig, DEFAULT_URL_TEMPLATE, NODE_PLACEHOLDER};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
