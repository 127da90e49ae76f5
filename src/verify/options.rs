use std::time::Duration;

use rand::Rng;
#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::catchall::DEFAULT_CAPACITY;
use crate::retry::RetryPolicy;
use crate::smtp::SmtpProbeOptions;

/// Pause taken before a catch-all probe, drawn uniformly from `min..=max`.
/// Two probes against the same exchanger back to back look like address
/// harvesting to most anti-abuse filters.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacingDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for PacingDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_secs(1),
            max: Duration::from_secs(3),
        }
    }
}

impl PacingDelay {
    pub fn new(min: Duration, max: Duration) -> Self {
        Self { min, max }
    }

    pub fn none() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }

    pub fn fixed(delay: Duration) -> Self {
        Self::new(delay, delay)
    }

    pub fn is_zero(&self) -> bool {
        self.min.is_zero() && self.max.is_zero()
    }

    /// Bounds given in the wrong order are swapped.
    pub fn sample(&self) -> Duration {
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        if lo == hi {
            return lo;
        }
        rand::thread_rng().gen_range(lo..=hi)
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierOptions {
    pub mx_retry: RetryPolicy,
    pub pacing: PacingDelay,
    pub smtp: SmtpProbeOptions,
    pub catch_all_cache_capacity: u64,
    /// Upper bound on one [`ErrorLog`](crate::ErrorLog) write; a slower
    /// write is abandoned and reported through `tracing`.
    pub error_log_timeout: Duration,
}

impl Default for VerifierOptions {
    fn default() -> Self {
        Self {
            mx_retry: RetryPolicy::default(),
            pacing: PacingDelay::default(),
            smtp: SmtpProbeOptions::default(),
            catch_all_cache_capacity: DEFAULT_CAPACITY,
            error_log_timeout: Duration::from_secs(2),
        }
    }
}

impl VerifierOptions {
    /// No retry pause and no pacing.
    pub fn without_delays() -> Self {
        Self {
            mx_retry: RetryPolicy::new(RetryPolicy::default().attempts, Duration::ZERO),
            pacing: PacingDelay::none(),
            ..Self::default()
        }
    }
}
