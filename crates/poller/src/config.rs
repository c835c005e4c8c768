use std::time::Duration;

use reel_core::error::CoreError;
use reel_core::poll::{DEFAULT_MAX_POLL_ATTEMPTS, DEFAULT_POLL_INTERVAL};
use reel_core::retry::{RetryPolicy, DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY};
use reel_core::types::DEFAULT_MODEL;

use crate::timing::DEFAULT_TICK_INTERVAL;

/// Timing and retry settings for a [`JobPoller`](crate::JobPoller).
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Model identifier used when the caller does not pick one.
    pub model: String,
    /// Submission retry policy.
    pub retry: RetryPolicy,
    /// Delay between status queries.
    pub poll_interval: Duration,
    /// Status queries allowed before the job times out.
    pub max_poll_attempts: u32,
    /// Cadence of elapsed-time updates.
    pub tick_interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            retry: RetryPolicy::default(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_poll_attempts: DEFAULT_MAX_POLL_ATTEMPTS,
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }
}

impl PollerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default    |
    /// |---------------------------|------------|
    /// | `REEL_MODEL`              | `video-01` |
    /// | `REEL_SUBMIT_RETRIES`     | `3`        |
    /// | `REEL_RETRY_DELAY_SECS`   | `2`        |
    /// | `REEL_POLL_INTERVAL_SECS` | `5`        |
    /// | `REEL_MAX_POLL_ATTEMPTS`  | `60`       |
    pub fn from_env() -> Result<Self, CoreError> {
        let model = std::env::var("REEL_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into());

        let max_retries = env_u64("REEL_SUBMIT_RETRIES", DEFAULT_MAX_RETRIES as u64)?;
        let retry_delay_secs = env_u64("REEL_RETRY_DELAY_SECS", DEFAULT_RETRY_DELAY.as_secs())?;
        let poll_interval_secs =
            env_u64("REEL_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL.as_secs())?;
        let max_poll_attempts =
            env_u64("REEL_MAX_POLL_ATTEMPTS", DEFAULT_MAX_POLL_ATTEMPTS as u64)?;

        let config = Self {
            model,
            retry: RetryPolicy {
                max_retries: to_u32("REEL_SUBMIT_RETRIES", max_retries)?,
                delay: Duration::from_secs(retry_delay_secs),
            },
            poll_interval: Duration::from_secs(poll_interval_secs),
            max_poll_attempts: to_u32("REEL_MAX_POLL_ATTEMPTS", max_poll_attempts)?,
            ..Self::default()
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject settings that would make polling meaningless.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.model.trim().is_empty() {
            return Err(CoreError::Config("Model identifier must not be empty".into()));
        }
        if self.max_poll_attempts == 0 {
            return Err(CoreError::Config(
                "Max poll attempts must be at least 1".into(),
            ));
        }
        if self.poll_interval.is_zero() || self.tick_interval.is_zero() {
            return Err(CoreError::Config(
                "Poll and tick intervals must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, CoreError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{name} must be a valid u64, got '{raw}'"))),
        Err(_) => Ok(default),
    }
}

fn to_u32(name: &str, value: u64) -> Result<u32, CoreError> {
    u32::try_from(value).map_err(|_| CoreError::Config(format!("{name} is out of range: {value}")))
}
