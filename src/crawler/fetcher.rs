//! HTTP fetcher implementation
//!
//! This module owns all network access for a run:
//! - Building one pooled HTTP client that every worker shares
//! - GET requests returning raw byte payloads
//! - Retry with exponential backoff on transient failures
//! - Error classification into terminal network errors and plain statuses
//!
//! It knows nothing about items; callers decode the bytes they get back.

use crate::config::HttpConfig;
use crate::HttpError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use std::time::Duration;

/// Retry behaviour for transient failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub retries: u32,
    /// Delay before the first retry; doubles for each one after
    pub backoff_base: Duration,
    /// Cap on any single delay, including server-requested ones
    pub max_backoff: Duration,
    /// Status codes worth retrying
    pub retry_statuses: Vec<u16>,
}

impl RetryPolicy {
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            retries: config.retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
            retry_statuses: config.retry_statuses.clone(),
        }
    }

    /// Total attempts a request may make
    pub fn max_attempts(&self) -> u32 {
        self.retries + 1
    }

    pub fn is_transient(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Exponential delay before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(16);
        self.backoff_base
            .saturating_mul(1u32 << exponent)
            .min(self.max_backoff)
    }

    /// Delay before retry `retry`, honouring a server `Retry-After` hint
    pub fn delay(&self, retry: u32, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(retry);
        retry_after
            .map_or(backoff, |hint| hint.max(backoff))
            .min(self.max_backoff)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&HttpConfig::default())
    }
}

/// Builds the pooled HTTP client
///
/// # Arguments
///
/// * `config` - The HTTP configuration
/// * `pool_size` - Idle connections kept per host, normally the worker count
pub fn build_http_client(config: &HttpConfig, pool_size: usize) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .pool_max_idle_per_host(pool_size)
        .gzip(true)
        .brotli(true)
        .build()
}

/// A transient failure that may be retried
struct Transient {
    reason: String,
    retry_after: Option<Duration>,
}

/// Retrying GET client shared by every worker of a run
///
/// Cloning is cheap: the underlying connection pool is reference counted.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    policy: RetryPolicy,
}

impl HttpClient {
    /// Creates a client from configuration
    pub fn new(config: &HttpConfig, pool_size: usize) -> Result<Self, HttpError> {
        let client = build_http_client(config, pool_size)?;
        Ok(Self::with_client(client, RetryPolicy::from_config(config)))
    }

    pub fn with_client(client: Client, policy: RetryPolicy) -> Self {
        Self { client, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | 2xx | Return body |
    /// | Status in the retry set | Retry with backoff |
    /// | Timeout / connection error | Retry with backoff |
    /// | Any other status | Immediate `HttpError::Status` |
    /// | Malformed request | Immediate `HttpError::Request` |
    ///
    /// After `retries + 1` attempts the last failure is surfaced as
    /// `HttpError::Network`.
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, HttpError> {
        let max_attempts = self.policy.max_attempts();
        let mut attempt = 0;

        loop {
            attempt += 1;

            let failure = match self.client.get(url).send().await {
                Ok(response) => match self.classify(url, response).await? {
                    Ok(body) => return Ok(body),
                    Err(transient) => transient,
                },
                Err(e) if e.is_builder() => {
                    return Err(HttpError::Request {
                        url: url.to_string(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => Transient {
                    reason: describe_transport_error(&e),
                    retry_after: None,
                },
            };

            if attempt >= max_attempts {
                return Err(HttpError::Network {
                    url: url.to_string(),
                    attempts: attempt,
                    reason: failure.reason,
                });
            }

            let delay = self.policy.delay(attempt, failure.retry_after);
            tracing::debug!(
                url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                reason = %failure.reason,
                "Transient failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }

    /// Sorts a response into success, transient failure, or terminal status
    async fn classify(
        &self,
        url: &str,
        response: Response,
    ) -> Result<Result<Vec<u8>, Transient>, HttpError> {
        let status = response.status();

        if status.is_success() {
            return Ok(match response.bytes().await {
                Ok(body) => Ok(body.to_vec()),
                Err(e) => Err(Transient {
                    reason: format!("failed to read body: {}", e),
                    retry_after: None,
                }),
            });
        }

        if self.policy.is_transient(status.as_u16()) {
            return Ok(Err(Transient {
                reason: format!("HTTP {}", status.as_u16()),
                retry_after: retry_after(&response),
            }));
        }

        Err(HttpError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// Statuses whose `Retry-After` header is honoured
const RETRY_AFTER_STATUSES: [u16; 2] = [429, 503];

/// Parses a `Retry-After` header given in seconds
///
/// Only rate limiting and overload responses carry a meaningful hint; the
/// header is ignored on every other status.
fn retry_after(response: &Response) -> Option<Duration> {
    if !RETRY_AFTER_STATUSES.contains(&response.status().as_u16()) {
        return None;
    }
    response
        .headers()
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

fn describe_transport_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        e.to_string()
    }
}
