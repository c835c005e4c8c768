//! Status poll loop.
//!
//! Sleeps, queries and feeds each answer to
//! [`reel_core::poll::advance`] until it yields a terminal step.

use std::time::Duration;

use reel_core::error::JobError;
use reel_core::poll::{advance, PollStep};
use reel_core::types::JobHandle;
use reel_provider::VideoProvider;
use tokio_util::sync::CancellationToken;

/// Poll `handle` every `interval` until it succeeds, fails or exhausts
/// `max_attempts`. Returns the result file id on success.
///
/// The first query is made one interval after submission.
pub async fn poll_until_terminal(
    provider: &dyn VideoProvider,
    handle: &JobHandle,
    interval: Duration,
    max_attempts: u32,
    cancel: &CancellationToken,
) -> Result<String, JobError> {
    let mut attempt = 1u32;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JobError::Cancelled),
            _ = tokio::time::sleep(interval) => {}
        }

        let observation = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JobError::Cancelled),
            result = provider.query_status(handle) => result.map_err(|e| e.to_string()),
        };

        let step = advance(
            attempt,
            max_attempts,
            observation.as_ref().map_err(String::as_str),
        );

        match step {
            PollStep::Continue { next_attempt } => {
                if let Ok(report) = &observation {
                    tracing::debug!(
                        task_id = %handle,
                        attempt,
                        status = %report.status,
                        "Generation still running",
                    );
                }
                attempt = next_attempt;
            }
            PollStep::Succeeded { file_id } => {
                tracing::info!(task_id = %handle, attempt, file_id = %file_id, "Generation succeeded");
                return Ok(file_id);
            }
            PollStep::Failed(err) => {
                tracing::warn!(task_id = %handle, attempt, error = %err, "Generation ended without result");
                return Err(err);
            }
        }
    }
}
