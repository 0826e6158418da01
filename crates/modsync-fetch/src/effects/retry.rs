use std::fmt::Display;
use std::future::Future;

use tokio_util::sync::CancellationToken;

use crate::core::RetryPolicy;

#[derive(Debug, thiserror::Error)]
pub enum RetryError<E: Display> {
    #[error("gave up after {attempts} attempts: {last}")]
    Exhausted { attempts: u32, last: E },

    #[error("failed with a non-retryable error after {attempts} attempts: {last}")]
    Fatal { attempts: u32, last: E },

    #[error("cancelled")]
    Cancelled,
}

/// Run `op` under `policy`, retrying every error.
///
/// `op` receives the zero-based attempt number.
pub async fn retry<T, E, F, Fut>(policy: &RetryPolicy, cancel: &CancellationToken, op: F) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    retry_when(policy, cancel, op, |_| true).await
}

/// Run `op` under `policy`, retrying only errors for which `should_retry` holds.
///
/// Both the attempt and the delay in between race against `cancel`; a
/// cancelled attempt is dropped mid-flight.
pub async fn retry_when<T, E, F, Fut, P>(
    policy: &RetryPolicy,
    cancel: &CancellationToken,
    mut op: F,
    should_retry: P,
) -> Result<T, RetryError<E>>
where
    E: Display,
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    P: Fn(&E) -> bool,
{
    let mut attempt = 0u32;
    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            outcome = op(attempt) => outcome,
        };

        let error = match outcome {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };

        if !should_retry(&error) {
            return Err(RetryError::Fatal {
                attempts: attempt + 1,
                last:     error,
            });
        }
        if attempt >= policy.max_retries {
            return Err(RetryError::Exhausted {
                attempts: attempt + 1,
                last:     error,
            });
        }

        attempt += 1;
        let delay = policy.delay_before(attempt);
        tracing::debug!(attempt, delay_ms = delay.as_millis() as u64, %error, "retrying");

        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(RetryError::Cancelled),
            _ = tokio::time::sleep(delay) => {}
        }
    }
}
