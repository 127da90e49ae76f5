//! Bounded retry for idempotent asynchronous operations.
//!
//! Only DNS resolution goes through [`RetryPolicy::run`]. SMTP dialogues are
//! never retried: repeated `RCPT TO` attempts in quick succession are exactly
//! what greylisting and rate-limiting defences look for.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// Number of attempts and the pause between two consecutive attempts.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 2,
            delay: Duration::from_secs(1),
        }
    }
}

/// Every attempt failed; `last` is the error of the final attempt.
#[derive(Debug, Error)]
#[error("gave up after {attempts} attempt(s): {last}")]
pub struct RetryExhausted<E> {
    pub attempts: u32,
    pub last: E,
}

impl RetryPolicy {
    pub fn new(attempts: u32, delay: Duration) -> Self {
        Self { attempts, delay }
    }

    /// Attempts actually performed; a configured `0` still runs once.
    pub fn effective_attempts(&self) -> u32 {
        self.attempts.max(1)
    }

    /// Runs `op` until it succeeds or the attempts are used up, sleeping
    /// `delay` between attempts (never after the last one).
    pub async fn run<T, E, F, Fut>(&self, mut op: F) -> Result<T, RetryExhausted<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: std::fmt::Display + std::fmt::Debug,
    {
        let attempts = self.effective_attempts();
        let mut attempt = 1;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if attempt >= attempts => {
                    return Err(RetryExhausted {
                        attempts,
                        last: err,
                    });
                }
                Err(err) => {
                    tracing::debug!(attempt, attempts, error = %err, "attempt failed, retrying");
                    if !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                    attempt += 1;
                }
            }
        }
    }
}
