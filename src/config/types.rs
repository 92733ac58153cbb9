use serde::Deserialize;
use std::time::Duration;

/// Placeholder substituted with the node name in the status URL template
pub const NODE_PLACEHOLDER: &str = "{node}";

/// Status endpoint every AREDN node serves; `{node}` is replaced by the node name
pub const DEFAULT_URL_TEMPLATE: &str =
    "http://{node}.local.mesh:8080/cgi-bin/sysinfo.json?hosts=1&link_info=1&lqm=1";

/// Main configuration structure for Mesh-Walker
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub walker: WalkerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawl behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WalkerConfig {
    /// Node the walk starts from
    #[serde(rename = "starting-node")]
    pub starting_node: String,

    /// Per-attempt HTTP timeout (seconds)
    #[serde(rename = "timeout-secs")]
    pub timeout_secs: u64,

    /// Total attempts per node, including the first one
    pub retries: u32,

    /// Upper bound of the random delay before each attempt (milliseconds)
    #[serde(rename = "jitter-ms")]
    pub jitter_ms: u64,

    /// Maximum number of fetch tasks in flight; 0 means unbounded
    #[serde(rename = "max-concurrent")]
    pub max_concurrent: usize,

    /// Capacity of the result stream between the crawl and its consumer
    #[serde(rename = "channel-capacity")]
    pub channel_capacity: usize,

    /// Status endpoint URL with a `{node}` placeholder
    #[serde(rename = "url-template")]
    pub url_template: String,
}

impl WalkerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn jitter(&self) -> Duration {
        Duration::from_millis(self.jitter_ms)
    }
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            starting_node: "KI5VMF-oklahoma-supernode".to_string(),
            timeout_secs: 120,
            retries: 5,
            jitter_ms: 5000,
            max_concurrent: 0,
            channel_capacity: 1,
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Published JSON document, replaced atomically at the end of a walk
    pub path: String,

    /// How often crawl progress is logged (seconds)
    #[serde(rename = "progress-interval-secs")]
    pub progress_interval_secs: u64,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: "/usr/share/nginx/html/data/out.json".to_string(),
            progress_interval_secs: 2,
        }
    }
}
