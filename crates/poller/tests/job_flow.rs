//! End-to-end poller behaviour against a scripted provider.
//!
//! Time is paused, so the 1 s timer, 2 s retry delay and 5 s poll
//! interval all run on tokio's virtual clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use reel_core::error::JobError;
use reel_poller::{JobPoller, PollerConfig};

use common::{http_error, location, request, status, success, ScriptedProvider, DEFAULT_URL};

fn poller_with(provider: &Arc<ScriptedProvider>) -> JobPoller {
    JobPoller::new(provider.clone(), PollerConfig::default())
}

// ---------------------------------------------------------------------------
// Successful jobs
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn successful_job_publishes_url_and_total_time() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(status("Queueing")));
    provider.push_status(Ok(status("Processing")));
    provider.push_status(Ok(success("file-1")));
    provider.push_retrieval(Ok(location(Some("example.com/file?token=abc"), None)));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a fox in the snow")).await;

    assert_eq!(outcome.unwrap(), "https://example.com/file");
    let snap = poller.snapshot();
    assert_eq!(snap.job, 1);
    assert_eq!(snap.prompt, "a fox in the snow");
    assert_eq!(snap.result_url.as_deref(), Some("https://example.com/file"));
    assert!(!snap.loading);
    assert!(snap.error.is_none());
    assert_eq!(snap.elapsed_secs, 15);
    assert_eq!(snap.total_secs, Some(15));
    assert!(snap.started_at.is_some());
    assert_eq!(provider.status_calls(), 3);
    assert_eq!(provider.retrieve_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn backup_url_used_when_primary_empty() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(success("file-1")));
    provider.push_retrieval(Ok(location(Some(""), Some("https://backup.example.com/f.mp4"))));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_eq!(outcome.unwrap(), "https://backup.example.com/f.mp4");
}

#[tokio::test(start_paused = true)]
async fn loading_flag_visible_to_subscribers_while_running() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(success("file-1")));
    let poller = poller_with(&provider);
    let mut rx = poller.subscribe();

    let ticket = poller.start(request("a prompt")).await;
    assert!(rx.borrow_and_update().loading);

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    rx.changed().await.unwrap();
    let running = rx.borrow_and_update().clone();
    assert!(running.loading);
    assert_eq!(running.elapsed_secs, 2);

    assert_eq!(ticket.outcome().await.unwrap(), DEFAULT_URL);
    assert!(!poller.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn set_prompt_publishes_without_starting_a_job() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);

    poller.set_prompt("draft prompt");

    let snap = poller.snapshot();
    assert_eq!(snap.prompt, "draft prompt");
    assert_eq!(snap.job, 0);
    assert!(!snap.loading);
    assert_eq!(provider.submit_calls(), 0);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn invalid_credentials_fail_fast() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.set_credentials(false);
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Credential));
    assert_eq!(provider.submit_calls(), 0);
    let snap = poller.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.is_some());
    assert_eq!(snap.total_secs, None);
}

#[tokio::test(start_paused = true)]
async fn exhausted_submission_retries_surface_attempt_count() {
    let provider = Arc::new(ScriptedProvider::new());
    for _ in 0..4 {
        provider.push_submit(Err(http_error(500)));
    }
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Submission { retries: 3, .. }));
    let snap = poller.snapshot();
    let message = snap.error.expect("error should be published");
    assert!(message.contains("3 retries"), "{message}");
    assert_eq!(snap.elapsed_secs, 6);
    assert_eq!(snap.total_secs, None);
    assert!(!snap.loading);
    assert_eq!(provider.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn success_without_file_id_is_malformed() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(status("Success")));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::MalformedSuccess));
    assert_eq!(provider.retrieve_calls(), 0);
    let snap = poller.snapshot();
    assert!(snap.result_url.is_none());
    assert_eq!(snap.total_secs, None);
}

#[tokio::test(start_paused = true)]
async fn failed_status_stops_polling_immediately() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(status("Processing")));
    let mut failed = status("Fail");
    failed.status_message = "content moderation".to_string();
    provider.push_status(Ok(failed));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;
    tokio::time::sleep(Duration::from_secs(30)).await;

    assert_matches!(outcome, Err(JobError::Poll(ref msg)) if msg.contains("content moderation"));
    assert_eq!(provider.status_calls(), 2);
    assert!(poller
        .snapshot()
        .error
        .unwrap()
        .contains("content moderation"));
}

#[tokio::test(start_paused = true)]
async fn status_http_error_is_terminal() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Err(http_error(502)));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Poll(ref msg)) if msg.contains("502"));
    assert_eq!(provider.status_calls(), 1);
    assert_eq!(provider.submit_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn never_finishing_job_times_out_after_sixty_polls() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Timeout { attempts: 60 }));
    assert_eq!(provider.status_calls(), 60);
    let snap = poller.snapshot();
    assert!(!snap.loading);
    assert_eq!(snap.elapsed_secs, 300);
    assert_eq!(snap.total_secs, None);
    assert!(snap.error.is_some());
}

#[tokio::test(start_paused = true)]
async fn missing_download_urls_fail_retrieval() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(success("file-1")));
    provider.push_retrieval(Ok(location(None, Some("  "))));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Retrieval(_)));
    assert_eq!(poller.snapshot().total_secs, None);
}

#[tokio::test(start_paused = true)]
async fn retrieval_http_error_fails_retrieval() {
    let provider = Arc::new(ScriptedProvider::new());
    provider.push_status(Ok(success("file-1")));
    provider.push_retrieval(Err(http_error(404)));
    let poller = poller_with(&provider);

    let outcome = poller.run(request("a prompt")).await;

    assert_matches!(outcome, Err(JobError::Retrieval(ref msg)) if msg.contains("404"));
}

// ---------------------------------------------------------------------------
// Cancellation
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn new_job_supersedes_running_job() {
    let provider = Arc::new(ScriptedProvider::new());
    // First job's only poll (at 5 s), then the second job's first poll.
    provider.push_status(Ok(status("Processing")));
    provider.push_status(Ok(success("file-b")));
    provider.push_retrieval(Ok(location(Some("https://cdn.example.com/b.mp4"), None)));
    let poller = poller_with(&provider);

    let first = poller.start(request("first prompt")).await;
    tokio::time::sleep(Duration::from_millis(7_500)).await;
    assert_eq!(poller.snapshot().elapsed_secs, 7);

    let second = poller.start(request("second prompt")).await;
    let second_job = second.job();
    assert_ne!(first.job(), second_job);

    assert_matches!(first.outcome().await, Err(JobError::Cancelled));
    assert_eq!(second.outcome().await.unwrap(), "https://cdn.example.com/b.mp4");

    tokio::time::sleep(Duration::from_secs(30)).await;
    let snap = poller.snapshot();
    assert_eq!(snap.job, second_job);
    assert_eq!(snap.prompt, "second prompt");
    assert_eq!(snap.elapsed_secs, 5);
    assert_eq!(snap.total_secs, Some(5));
    assert!(snap.error.is_none());
    assert!(!snap.loading);
    assert_eq!(provider.status_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn cancel_clears_loading_without_error() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);

    let ticket = poller.start(request("a prompt")).await;
    tokio::time::sleep(Duration::from_secs(3)).await;
    poller.cancel().await;

    assert_matches!(ticket.outcome().await, Err(JobError::Cancelled));
    let snap = poller.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.is_none());
    assert_eq!(snap.total_secs, None);
    assert_eq!(snap.elapsed_secs, 3);
}

#[tokio::test(start_paused = true)]
async fn shutdown_cancels_active_job() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);

    let ticket = poller.start(request("a prompt")).await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    poller.shutdown().await;

    assert_matches!(ticket.outcome().await, Err(JobError::Cancelled));
    assert!(!poller.snapshot().loading);
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_previously_cancelled_job() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);

    let ticket = poller.start(request("a prompt")).await;
    tokio::time::sleep(Duration::from_secs(1)).await;
    poller.cancel().await;
    poller.shutdown().await;

    let snap = poller.snapshot();
    assert!(!snap.loading);
    assert!(snap.error.is_none());
    assert_eq!(snap.elapsed_secs, 1);
    assert_matches!(ticket.outcome().await, Err(JobError::Cancelled));
}

#[tokio::test(start_paused = true)]
async fn start_after_shutdown_never_contacts_provider() {
    let provider = Arc::new(ScriptedProvider::new());
    let poller = poller_with(&provider);
    poller.set_prompt("draft prompt");
    poller.shutdown().await;
    let before = poller.snapshot();

    let outcome = poller.run(request("late prompt")).await;

    assert_matches!(outcome, Err(JobError::Cancelled));
    assert_eq!(provider.submit_calls(), 0);
    assert_eq!(poller.snapshot(), before);
}
