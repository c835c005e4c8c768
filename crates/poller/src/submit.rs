//! Job submission with fixed-delay retries.

use reel_core::error::JobError;
use reel_core::retry::{RetryDecision, RetryPolicy};
use reel_core::types::{GenerationRequest, JobHandle};
use reel_provider::VideoProvider;
use tokio_util::sync::CancellationToken;

/// Submit `request`, retrying transient failures according to `policy`.
///
/// Credentials are checked once up front; a failed check returns
/// [`JobError::Credential`] without calling the provider. Waiting between
/// attempts respects `cancel`.
pub async fn submit_with_retry(
    provider: &dyn VideoProvider,
    request: &GenerationRequest,
    policy: &RetryPolicy,
    cancel: &CancellationToken,
) -> Result<JobHandle, JobError> {
    if !provider.validate_credentials() {
        tracing::warn!("Provider credentials failed pre-flight check");
        return Err(JobError::Credential);
    }

    let mut retries = 0u32;

    loop {
        let attempt = retries + 1;

        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(JobError::Cancelled),
            result = provider.submit(request) => result,
        };

        let error = match result {
            Ok(handle) => {
                tracing::info!(task_id = %handle, attempt, "Generation job submitted");
                return Ok(handle);
            }
            Err(e) => e,
        };

        match policy.decide(retries) {
            RetryDecision::RetryAfter(delay) => {
                tracing::warn!(
                    attempt,
                    error = %error,
                    delay_ms = delay.as_millis() as u64,
                    "Submission attempt failed, retrying",
                );
                tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return Err(JobError::Cancelled),
                    _ = tokio::time::sleep(delay) => {}
                }
                retries += 1;
            }
            RetryDecision::GiveUp { retries } => {
                tracing::error!(attempt, retries, error = %error, "Submission failed, giving up");
                return Err(JobError::Submission {
                    retries,
                    attempts: attempt,
                    reason: error.to_string(),
                });
            }
        }
    }
}
