//! Mapping from provider status strings to [`JobStatus`].
//!
//! Matching is case-insensitive against a small fixed vocabulary. Any
//! status outside the vocabulary is treated as a failure.

use serde::Serialize;

/// Provider statuses meaning the task is waiting to run.
pub const PENDING_STATUSES: &[&str] = &["pending", "queueing", "queued", "preparing"];

/// Provider statuses meaning the task is running.
pub const PROCESSING_STATUSES: &[&str] = &["processing"];

/// Provider statuses meaning the task finished successfully.
pub const SUCCESS_STATUSES: &[&str] = &["success", "succeeded"];

/// Status message some providers send while the task is still running.
pub const PROCESSING_STATUS_MESSAGE: &str = "processing";

/// Internal status of a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

impl JobStatus {
    /// Derive the status from the provider's status string and message.
    pub fn from_provider(status: &str, status_message: &str) -> Self {
        let status = status.trim();

        if matches_any(status, SUCCESS_STATUSES) {
            Self::Succeeded
        } else if matches_any(status, PROCESSING_STATUSES)
            || status_message
                .trim()
                .eq_ignore_ascii_case(PROCESSING_STATUS_MESSAGE)
        {
            Self::Processing
        } else if matches_any(status, PENDING_STATUSES) {
            Self::Pending
        } else {
            Self::Failed
        }
    }

    /// Whether polling should continue.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Processing)
    }
}

fn matches_any(status: &str, vocabulary: &[&str]) -> bool {
    vocabulary.iter().any(|v| status.eq_ignore_ascii_case(v))
}
