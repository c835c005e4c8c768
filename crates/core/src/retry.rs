//! Fixed-delay retry policy for job submission.
//!
//! Unlike exponential reconnect backoff, submission retries wait the same
//! delay between every attempt.

use std::time::Duration;

/// Maximum number of retries after the first submission attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Delay between submission attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Tunable parameters for submission retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Wait before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
        }
    }
}

/// What to do after a failed submission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait `delay`, then make another attempt.
    RetryAfter(Duration),
    /// Stop; `retries` retries were made on top of the first attempt.
    GiveUp { retries: u32 },
}

impl RetryPolicy {
    /// Decide based on how many retries have already been made.
    pub fn decide(&self, retries_so_far: u32) -> RetryDecision {
        if retries_so_far < self.max_retries {
            RetryDecision::RetryAfter(self.delay)
        } else {
            RetryDecision::GiveUp {
                retries: retries_so_far,
            }
        }
    }

    /// Total attempts allowed, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }
}
