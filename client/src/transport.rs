use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::TransportError;

/// Bounds every request with a timeout and allows one retry after a
/// retryable failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub timeout: Duration,
    pub attempts: u32,
}

impl RetryPolicy {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout, attempts: 2 }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Duration::from_millis(shared::constants::DEFAULT_REQUEST_TIMEOUT_MS))
    }
}

pub async fn send_with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    request: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    send_with_retry_if(policy, operation, TransportError::is_retryable, request).await
}

/// Same as `send_with_retry`, with the caller deciding which failures may be
/// sent again.
pub async fn send_with_retry_if<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    retryable: fn(&TransportError) -> bool,
    mut request: F,
) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 1;
    loop {
        let result = match tokio::time::timeout(policy.timeout, request()).await {
            Ok(result) => result,
            Err(_) => Err(TransportError::Timeout(policy.timeout)),
        };

        match result {
            Err(e) if attempt < policy.attempts && retryable(&e) => {
                warn!(
                    event = "transport_retry",
                    operation = operation,
                    attempt = attempt,
                    "{} failed, retrying: {}", operation, e
                );
                attempt += 1;
            }
            other => return other,
        }
    }
}
