//! Mesh-Walker main entry point
//!
//! This is the command-line interface for the Mesh-Walker mesh map generator.

use anyhow::Context;
use clap::Parser;
use mesh_walker::config::{load_config_with_hash, validate, Config};
use mesh_walker::output::print_statistics;
use mesh_walker::run_walk;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mesh-Walker: maps an AREDN mesh network
///
/// Mesh-Walker starts at one node, follows every host each node reports,
/// and publishes the locations, links and hardware of every reachable node
/// as a single JSON document.
#[derive(Parser, Debug)]
#[command(name = "mesh-walker")]
#[command(version)]
#[command(about = "Crawls an AREDN mesh and publishes its topology", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Node to start the walk from
    #[arg(long, value_name = "NODE")]
    start_node: Option<String>,

    /// Where to publish the resulting JSON document
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Maximum number of node fetches in flight (0 = unbounded)
    #[arg(long, value_name = "N")]
    max_concurrent: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be walked without walking
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = load_effective_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_walk(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mesh_walker=info,warn"),
            1 => EnvFilter::new("mesh_walker=debug,info"),
            2 => EnvFilter::new("mesh_walker=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any) and applies command-line overrides
fn load_effective_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(node) = &cli.start_node {
        config.walker.starting_node = node.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if let Some(limit) = cli.max_concurrent {
        config.walker.max_concurrent = limit;
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Mesh-Walker Dry Run ===\n");

    println!("Walker Configuration:");
    println!("  Starting node: {}", config.walker.starting_node);
    println!("  Timeout: {}s", config.walker.timeout_secs);
    println!("  Attempts per node: {}", config.walker.retries);
    println!("  Jitter: up to {}ms", config.walker.jitter_ms);
    match config.walker.max_concurrent {
        0 => println!("  Max concurrent fetches: unbounded"),
        n => println!("  Max concurrent fetches: {}", n),
    }
    println!("  Result channel capacity: {}", config.walker.channel_capacity);
    println!("  Status URL template: {}", config.walker.url_template);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!(
        "  Progress interval: {}s",
        config.output.progress_interval_secs
    );

    println!("\n✓ Configuration is valid");
}

/// Handles the main walk: crawl, assemble, publish
async fn handle_walk(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Walking from {} (attempts: {}, timeout: {}s)",
        config.walker.starting_node,
        config.walker.retries,
        config.walker.timeout_secs
    );

    let summary = run_walk(&config)
        .await
        .with_context(|| format!("Error walking from {}", config.walker.starting_node))?;

    print_statistics(&summary.stats, summary.hosts_scraped);

    Ok(())
}
