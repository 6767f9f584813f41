//! Retry and polling engine
//!
//! One generic retry loop drives every wait in the crate: fixed interval, a
//! bounded attempt budget, sleeps only between attempts, and no backoff or
//! jitter. The FaaS converges quickly or not at all, so an even cadence
//! keeps total wait time predictable.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::deployment::Deployment;
use crate::error::{Error, Result};
use crate::protocol::api::FaasClient;

/// Default attempt budget for [`RetryPolicy::default`]
pub const DEFAULT_MAX_RETRIES: u32 = 30;

/// Default pause between attempts for [`RetryPolicy::default`]
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_millis(2000);

const READINESS_MAX_RETRIES: u32 = 30;
const READINESS_INTERVAL: Duration = Duration::from_millis(1000);

const DEPLOYMENT_MAX_RETRIES: u32 = 10;
const DEPLOYMENT_INTERVAL: Duration = Duration::from_millis(2000);

/// Cap on operation labels quoted in exhaustion errors
const MAX_LABEL_LEN: usize = 48;

/// Attempt budget and cadence of one retry loop.
///
/// Policies are plain knobs; every wait in the crate runs the same
/// algorithm under a different policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, interval: Duration) -> Self {
        Self {
            max_retries,
            interval,
        }
    }

    /// Cadence for probing a plane that is still starting up
    pub fn readiness() -> Self {
        Self::new(READINESS_MAX_RETRIES, READINESS_INTERVAL)
    }

    /// Cadence for waiting on an accepted deployment to become visible
    pub fn deployment() -> Self {
        Self::new(DEPLOYMENT_MAX_RETRIES, DEPLOYMENT_INTERVAL)
    }
}

fn truncate_label(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_LEN {
        label.to_string()
    } else {
        let short: String = label.chars().take(MAX_LABEL_LEN).collect();
        format!("{short}...")
    }
}

/// Run `op` until it succeeds or the budget is gone.
///
/// Attempts are strictly sequential and the interval elapses only *between*
/// them, so `n` attempts cost exactly `n - 1` sleeps. Intermediate failures
/// are logged at debug and swallowed; exhaustion surfaces the last failure's
/// `Display` output inside [`Error::RetryExhausted`]. A zero budget fails
/// immediately without invoking `op`.
pub async fn wait_for<T, E, F, Fut>(label: &str, policy: RetryPolicy, mut op: F) -> Result<T>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    let mut last_error = String::from("never attempted");

    for attempt in 1..=policy.max_retries {
        match op().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                last_error = err.to_string();
                tracing::debug!(
                    "attempt {}/{} of {} failed: {}",
                    attempt,
                    policy.max_retries,
                    label,
                    last_error
                );
            }
        }

        if attempt < policy.max_retries {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(Error::RetryExhausted {
        operation: truncate_label(label),
        attempts: policy.max_retries,
        last_error,
    })
}

/// Poll the readiness endpoint until the plane answers HTTP 200.
///
/// A connection failure on the *first* probe means nothing is listening at
/// the base URL at all, and escalates to [`Error::Unreachable`] immediately;
/// once the plane has been seen listening, later connection failures retry
/// like any other error.
pub async fn wait_for_readiness(client: &FaasClient, policy: RetryPolicy) -> Result<()> {
    let mut last_error = String::from("never attempted");

    for attempt in 0..policy.max_retries {
        match client.readiness().await {
            Ok(()) => return Ok(()),
            Err(err) => {
                if attempt == 0 && err.is_connect() {
                    return Err(Error::Unreachable {
                        url: client.base_url().join("readiness")?.to_string(),
                    });
                }
                last_error = err.to_string();
                tracing::debug!(
                    "attempt {}/{} of readiness failed: {}",
                    attempt + 1,
                    policy.max_retries,
                    last_error
                );
            }
        }

        if attempt + 1 < policy.max_retries {
            tokio::time::sleep(policy.interval).await;
        }
    }

    Err(Error::RetryExhausted {
        operation: "readiness".to_string(),
        attempts: policy.max_retries,
        last_error,
    })
}

/// Poll until a deployment with the given suffix shows up in inspect.
/// Absorbs the lag between deploy acceptance and inspect visibility.
pub async fn wait_for_deployment(
    client: &FaasClient,
    suffix: &str,
    policy: RetryPolicy,
) -> Result<Deployment> {
    let label = format!("deployment \"{suffix}\"");
    wait_for(&label, policy, || client.inspect_by_name(suffix)).await
}
