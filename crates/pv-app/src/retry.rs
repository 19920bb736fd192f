//! Bounded retry with backoff for fallible store calls.
//! 针对存储调用的有限重试与退避。

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::warn;

/// Delay curve between attempts.
#[derive(Debug, Clone, Copy)]
pub enum Backoff {
    /// Same delay after every failed attempt.
    Constant(Duration),
    /// `step`, `2*step`, `3*step`, ...
    Linear(Duration),
    /// `base`, `2*base`, `4*base`, ...
    Exponential { base: Duration },
}

impl Backoff {
    /// Delay after the given failed attempt (attempts are numbered from 1).
    fn delay_after(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::Constant(step) => step,
            Backoff::Linear(step) => step.mul_f32(attempt as f32),
            Backoff::Exponential { base } => {
                // Cap the shift so a large attempt budget cannot overflow.
                base.saturating_mul(1u32 << (attempt - 1).min(16))
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum RetryError {
    /// The shared scope was cancelled before or during an attempt.
    #[error("cancelled before the unit of work completed")]
    Cancelled,

    /// Every attempt failed; carries the last observed error.
    #[error("failed after {attempts} attempts")]
    Exhausted {
        attempts: u32,
        #[source]
        source: anyhow::Error,
    },
}

/// Retry policy shared by every persistence task of one save request.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Backoff,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, backoff: Backoff) -> Self {
        Self {
            // Zero attempts would make every unit of work vanish silently.
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Run `op` until it succeeds, the attempt budget is exhausted, or the
    /// scope is cancelled.
    ///
    /// The cancellation signal is honored at three points: before each
    /// attempt, at every await inside the running attempt, and during the
    /// backoff sleep. Every error from `op` counts as retryable here; callers
    /// that must not retry (duplicate checks, validation) run before entering
    /// this wrapper.
    pub async fn run<F, Fut>(&self, scope: &CancellationToken, mut op: F) -> Result<(), RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let mut attempt: u32 = 1;
        loop {
            if scope.is_cancelled() {
                return Err(RetryError::Cancelled);
            }

            let outcome = tokio::select! {
                _ = scope.cancelled() => return Err(RetryError::Cancelled),
                outcome = op() => outcome,
            };

            match outcome {
                Ok(()) => return Ok(()),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            source: err,
                        });
                    }

                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        error = %err,
                        "Attempt failed; retrying"
                    );
                    let backoff = self.backoff.delay_after(attempt);
                    tokio::select! {
                        _ = scope.cancelled() => return Err(RetryError::Cancelled),
                        _ = sleep(backoff) => {}
                    }
                    attempt = attempt.saturating_add(1);
                }
            }
        }
    }
}
