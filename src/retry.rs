//! Outbound call policy
//!
//! Every call to a third-party service runs under a timeout and gets a
//! bounded number of extra attempts with exponential backoff. Only transient
//! failures (`Error::Network`) are retried; everything else returns at once.

use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Timeout and retry settings for one outbound service
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Per-attempt timeout
    pub timeout: Duration,
    /// Extra attempts after the first one
    pub retries: u32,
    /// Delay before the first retry, doubled for each later one
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn new(timeout: Duration, retries: u32, backoff: Duration) -> Self {
        Self {
            timeout,
            retries,
            backoff,
        }
    }

    /// Build from config-style values (seconds and milliseconds)
    pub fn from_settings(timeout_secs: u64, retries: u32, backoff_ms: u64) -> Self {
        Self::new(
            Duration::from_secs(timeout_secs),
            retries,
            Duration::from_millis(backoff_ms),
        )
    }

    /// A single attempt, no retries
    pub fn once(timeout: Duration) -> Self {
        Self::new(timeout, 0, Duration::ZERO)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_secs(30), 1, Duration::from_millis(500))
    }
}

/// Run `op` under `policy`
///
/// `what` names the call in log lines and in the timeout error.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let attempts = policy.retries + 1;
    let mut attempt = 1;
    let mut backoff = policy.backoff;

    loop {
        debug!("{}: attempt {}/{}", what, attempt, attempts);

        let err = match timeout(policy.timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(e)) if e.is_transient() => e,
            Ok(Err(e)) => return Err(e),
            Err(_) => Error::Network(format!(
                "{} timed out after {}ms",
                what,
                policy.timeout.as_millis()
            )),
        };

        if attempt >= attempts {
            warn!("{}: giving up after {} attempt(s): {}", what, attempts, err);
            return Err(err);
        }

        warn!("{}: {} (retrying in {}ms)", what, err, backoff.as_millis());
        sleep(backoff).await;
        backoff *= 2;
        attempt += 1;
    }
}
