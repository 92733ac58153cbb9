//! HTTP fetcher for node status records
//!
//! This module handles all HTTP requests for the walker, including:
//! - Building an HTTP client that opens a fresh connection per attempt
//! - Building the status URL for a node from the configured template
//! - Retry logic with randomized delays for the lossy radio links
//! - Decoding `sysinfo.json` into a `NodeStatus`

use crate::config::{WalkerConfig, NODE_PLACEHOLDER};
use crate::status::NodeStatus;
use crate::{FetchError, FetchResult};
use reqwest::header::{HeaderMap, HeaderValue, CONNECTION};
use reqwest::{Client, StatusCode};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Source of the delay slept before every attempt
pub trait Jitter: Send + Sync + fmt::Debug {
    fn delay(&self) -> Duration;
}

/// Uniformly random delay in `[0, max)`; a zero bound never sleeps
#[derive(Debug, Clone, Copy)]
pub struct RandomJitter {
    max: Duration,
}

impl RandomJitter {
    pub fn new(max: Duration) -> Self {
        Self { max }
    }
}

impl Jitter for RandomJitter {
    fn delay(&self) -> Duration {
        let max_nanos = u64::try_from(self.max.as_nanos()).unwrap_or(u64::MAX);
        if max_nanos == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(rand::random_range(0..max_nanos))
    }
}

/// Builds an HTTP client for talking to mesh nodes
///
/// Keep-alive is disabled: every attempt opens its own connection so a
/// connection wedged by a flaky radio hop is never reused by the retry.
///
/// # Arguments
///
/// * `timeout` - Per-request timeout, covering connect through body
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(CONNECTION, HeaderValue::from_static("close"));

    Client::builder()
        .user_agent(concat!("mesh-walker/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()
}

/// Fetches node status records with retries
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | Transport error (connect, timeout, body read) | Retry after jitter |
/// | HTTP status other than 200 | Retry after jitter |
/// | Body is not a valid status record | Immediate error |
/// | Attempts exhausted | Error naming the last failure |
///
/// A jitter delay is also slept before the very first attempt so that
/// hundreds of freshly spawned fetches do not hit the mesh in lockstep.
#[derive(Debug, Clone)]
pub struct FetchClient {
    client: Client,
    url_template: String,
    attempts: u32,
    jitter: Arc<dyn Jitter>,
}

impl FetchClient {
    /// Creates a client
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-attempt timeout
    /// * `attempts` - Total attempts per node, at least 1
    /// * `jitter` - Upper bound of the random pre-attempt delay
    /// * `url_template` - Status URL containing a `{node}` placeholder
    pub fn new(
        timeout: Duration,
        attempts: u32,
        jitter: Duration,
        url_template: impl Into<String>,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(timeout)?,
            url_template: url_template.into(),
            attempts: attempts.max(1),
            jitter: Arc::new(RandomJitter::new(jitter)),
        })
    }

    /// Creates a client from the walker configuration
    pub fn from_config(config: &WalkerConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            config.timeout(),
            config.retries,
            config.jitter(),
            config.url_template.clone(),
        )
    }

    /// Replaces the source of pre-attempt delays
    pub fn with_jitter(mut self, jitter: Arc<dyn Jitter>) -> Self {
        self.jitter = jitter;
        self
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Builds the status URL for `node`
    pub fn status_url(&self, node: &str) -> FetchResult<Url> {
        let raw = self.url_template.replace(NODE_PLACEHOLDER, node);
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            node: node.to_string(),
            message: format!("'{}': {}", raw, e),
        })
    }

    /// Fetches and decodes the status record of `node`
    ///
    /// # Returns
    ///
    /// * `Ok(NodeStatus)` - A 200 response with a well-formed body
    /// * `Err(FetchError)` - Attempts exhausted, malformed body, or bad URL
    pub async fn get(&self, node: &str) -> FetchResult<NodeStatus> {
        let url = self.status_url(node)?;

        self.sleep_jitter().await;

        let mut attempt = 1;
        loop {
            let outcome = self
                .attempt(node, &url, attempt)
                .await
                .and_then(|body| decode_status(node, &body));

            match outcome {
                Ok(status) => return Ok(status),
                Err(e) if e.is_retryable() && attempt < self.attempts => {
                    tracing::debug!(
                        "Attempt {}/{} for {} failed: {}",
                        attempt,
                        self.attempts,
                        node,
                        e
                    );
                    self.sleep_jitter().await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// Performs one GET, returning the body of a 200 response
    async fn attempt(&self, node: &str, url: &Url, attempt: u32) -> FetchResult<Vec<u8>> {
        let transport = |source: reqwest::Error| FetchError::Transport {
            node: node.to_string(),
            attempts: attempt,
            source,
        };

        let response = self.client.get(url.clone()).send().await.map_err(transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                node: node.to_string(),
                status: status.as_u16(),
                attempts: attempt,
            });
        }

        let body = response.bytes().await.map_err(transport)?;
        Ok(body.to_vec())
    }

    async fn sleep_jitter(&self) {
        let delay = self.jitter.delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// Decodes a `sysinfo.json` body
pub fn decode_status(node: &str, body: &[u8]) -> FetchResult<NodeStatus> {
    serde_json::from_slice(body).map_err(|source| FetchError::Decode {
        node: node.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_client(template: &str) -> FetchClient {
        FetchClient::new(Duration::from_secs(5), 3, Duration::ZERO, template).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(Duration::from_secs(10)).is_ok());
    }

    #[test]
    fn test_status_url_default_template() {
        let client = create_test_client(crate::config::DEFAULT_URL_TEMPLATE);
        let url = client.status_url("KI5VMF-oklahoma-supernode").unwrap();

        assert_eq!(
            url.as_str(),
            "http://ki5vmf-oklahoma-supernode.local.mesh:8080/cgi-bin/sysinfo.json?hosts=1&link_info=1&lqm=1"
        );
    }

    #[test]
    fn test_status_url_rejects_unusable_node_name() {
        let client = create_test_client(crate::config::DEFAULT_URL_TEMPLATE);
        let err = client.status_url("bad host name").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_attempts_floor_is_one() {
        let client =
            FetchClient::new(Duration::from_secs(1), 0, Duration::ZERO, "http://{node}/").unwrap();
        assert_eq!(client.attempts(), 1);
    }

    #[test]
    fn test_random_jitter_bounds() {
        let jitter = RandomJitter::new(Duration::from_millis(50));
        for _ in 0..200 {
            assert!(jitter.delay() < Duration::from_millis(50));
        }
    }

    #[test]
    fn test_zero_jitter_never_sleeps() {
        let jitter = RandomJitter::new(Duration::ZERO);
        assert_eq!(jitter.delay(), Duration::ZERO);
    }

    #[test]
    fn test_decode_status_malformed_body() {
        let err = decode_status("N0CALL", b"<html>not json</html>").unwrap_err();
        assert!(matches!(err, FetchError::Decode { .. }));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_decode_status_ok() {
        let status = decode_status("N0CALL", br#"{"node": "N0CALL", "lat": "", "lon": ""}"#).unwrap();
        assert_eq!(status.node, "N0CALL");
    }
}
