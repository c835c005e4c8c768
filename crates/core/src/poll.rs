//! Status polling state machine.
//!
//! [`advance`] is a pure transition function: given the attempt number
//! just made and what the provider answered, it returns the next
//! [`PollStep`]. The async loop in `reel-poller` only sleeps, queries and
//! feeds the result back in.

use std::time::Duration;

use crate::error::JobError;
use crate::status::JobStatus;
use crate::types::StatusReport;

/// Interval between status queries.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Status queries allowed before giving up (about five minutes).
pub const DEFAULT_MAX_POLL_ATTEMPTS: u32 = 60;

/// Result of one poll tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollStep {
    /// Still running; poll again as attempt `next_attempt`.
    Continue { next_attempt: u32 },
    /// Finished with a result file.
    Succeeded { file_id: String },
    /// Terminal failure; no further polling.
    Failed(JobError),
}

/// Compute the next step after poll attempt `attempt` (1-based).
///
/// `observation` is the provider's answer, or the rendered error when the
/// query itself failed.
pub fn advance(
    attempt: u32,
    max_attempts: u32,
    observation: Result<&StatusReport, &str>,
) -> PollStep {
    let report = match observation {
        Ok(report) => report,
        Err(reason) => return PollStep::Failed(JobError::Poll(reason.to_string())),
    };

    let status = JobStatus::from_provider(&report.status, &report.status_message);
    if status.is_active() {
        return if attempt >= max_attempts {
            PollStep::Failed(JobError::Timeout { attempts: attempt })
        } else {
            PollStep::Continue {
                next_attempt: attempt + 1,
            }
        };
    }

    match status {
        JobStatus::Succeeded => match report.file_id.as_deref().map(str::trim) {
            Some(file_id) if !file_id.is_empty() => PollStep::Succeeded {
                file_id: file_id.to_string(),
            },
            _ => PollStep::Failed(JobError::MalformedSuccess),
        },
        _ => PollStep::Failed(JobError::Poll(describe_failure(report))),
    }
}

fn describe_failure(report: &StatusReport) -> String {
    let message = report.status_message.trim();
    if message.is_empty() {
        format!("provider status '{}'", report.status)
    } else {
        format!("provider status '{}': {message}", report.status)
    }
}
