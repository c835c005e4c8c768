//! Single-job generation poller.
//!
//! [`JobPoller`] drives one job at a time through submit -> poll ->
//! retrieve while a [`TimingTracker`] republishes elapsed time. Each job
//! gets its own [`CancellationToken`] (a child of the poller's master
//! token) and its own job id; starting a new job cancels the previous
//! token and takes over the snapshot, after which the old job's writes
//! are discarded.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use reel_core::error::{CoreError, JobError};
use reel_core::types::GenerationRequest;
use reel_provider::VideoProvider;
use tokio::sync::{oneshot, watch, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::PollerConfig;
use crate::retrieve::fetch_download_url;
use crate::state::{GenerationSnapshot, JobPublisher, SharedState};
use crate::status::poll_until_terminal;
use crate::submit::submit_with_retry;
use crate::timing::TimingTracker;

/// How long [`JobPoller::shutdown`] waits for the active job task.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a job: the download URL or the terminal error.
pub type JobOutcome = Result<String, JobError>;

/// Runs generation jobs against a provider and publishes their progress.
pub struct JobPoller {
    provider: Arc<dyn VideoProvider>,
    config: PollerConfig,
    state: SharedState,
    slot: Mutex<JobSlot>,
    /// Master cancellation token -- cancelled during shutdown.
    cancel: CancellationToken,
}

/// Bookkeeping for the job id counter and the active job.
#[derive(Default)]
struct JobSlot {
    last_job: u64,
    active: Option<ActiveJob>,
    /// Cancelled jobs that may still be unwinding; awaited on shutdown.
    retiring: Vec<ActiveJob>,
}

impl JobSlot {
    /// Cancel the active job and keep its task until it has finished.
    /// Returns the job id if it was still running.
    fn retire_active(&mut self) -> Option<u64> {
        self.retiring.retain(|job| !job.task.is_finished());
        let previous = self.active.take()?;
        previous.cancel.cancel();
        if previous.task.is_finished() {
            return None;
        }
        let id = previous.id;
        self.retiring.push(previous);
        Some(id)
    }
}

struct ActiveJob {
    id: u64,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// Handle to a started job.
pub struct JobTicket {
    job: u64,
    outcome: oneshot::Receiver<JobOutcome>,
}

impl JobTicket {
    pub fn job(&self) -> u64 {
        self.job
    }

    /// Wait for the job to finish.
    ///
    /// A job whose result was not published because it was superseded,
    /// cancelled or aborted resolves to [`JobError::Cancelled`].
    pub async fn outcome(self) -> JobOutcome {
        self.outcome.await.unwrap_or(Err(JobError::Cancelled))
    }
}

impl JobPoller {
    pub fn new(provider: Arc<dyn VideoProvider>, config: PollerConfig) -> Self {
        let (tx, _rx) = watch::channel(GenerationSnapshot::default());
        Self {
            provider,
            config,
            state: Arc::new(tx),
            slot: Mutex::new(JobSlot::default()),
            cancel: CancellationToken::new(),
        }
    }

    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Subscribe to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<GenerationSnapshot> {
        self.state.subscribe()
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> GenerationSnapshot {
        self.state.borrow().clone()
    }

    /// Publish prompt text being edited, outside of any job.
    pub fn set_prompt(&self, prompt: impl Into<String>) {
        let prompt = prompt.into();
        self.state.send_if_modified(|s| {
            if s.prompt == prompt {
                return false;
            }
            s.prompt = prompt;
            true
        });
    }

    /// Build a request for `prompt` with the configured default model.
    pub fn request(&self, prompt: impl Into<String>) -> Result<GenerationRequest, CoreError> {
        GenerationRequest::new(prompt, self.config.model.clone())
    }

    /// Start a job, cancelling any job that is still running.
    ///
    /// After [`shutdown`](Self::shutdown) no job is started: the ticket
    /// resolves to [`JobError::Cancelled`] without contacting the provider
    /// or touching the snapshot.
    pub async fn start(&self, request: GenerationRequest) -> JobTicket {
        let mut slot = self.slot.lock().await;
        slot.last_job += 1;
        let job = slot.last_job;

        if self.cancel.is_cancelled() {
            tracing::warn!(job, "Job poller is shut down, not starting job");
            let (outcome_tx, outcome_rx) = oneshot::channel();
            let _ = outcome_tx.send(Err(JobError::Cancelled));
            return JobTicket {
                job,
                outcome: outcome_rx,
            };
        }

        if let Some(previous) = slot.retire_active() {
            tracing::info!(job = previous, "Cancelling superseded job");
        }

        self.state.send_modify(|s| {
            *s = GenerationSnapshot {
                job,
                prompt: request.prompt().to_string(),
                loading: true,
                started_at: Some(Utc::now()),
                ..Default::default()
            };
        });

        let cancel = self.cancel.child_token();
        let publisher = JobPublisher::new(Arc::clone(&self.state), job);
        let (outcome_tx, outcome_rx) = oneshot::channel();

        tracing::info!(job, model = request.model(), "Starting generation job");

        let task = tokio::spawn(run_job(
            Arc::clone(&self.provider),
            self.config.clone(),
            request,
            publisher,
            cancel.clone(),
            outcome_tx,
        ));

        slot.active = Some(ActiveJob {
            id: job,
            cancel,
            task,
        });

        JobTicket {
            job,
            outcome: outcome_rx,
        }
    }

    /// Start a job and wait for its outcome.
    pub async fn run(&self, request: GenerationRequest) -> JobOutcome {
        self.start(request).await.outcome().await
    }

    /// Cancel the active job, if any. No error is published for it.
    pub async fn cancel(&self) {
        if let Some(job) = self.slot.lock().await.retire_active() {
            tracing::info!(job, "Cancelling job");
        }
    }

    /// Cancel everything and wait briefly for job tasks to unwind,
    /// including jobs cancelled earlier that are still finishing.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down job poller");
        self.cancel.cancel();

        let jobs = {
            let mut slot = self.slot.lock().await;
            slot.retire_active();
            std::mem::take(&mut slot.retiring)
        };

        let ids: Vec<u64> = jobs.iter().map(|job| job.id).collect();
        let tasks = async {
            for job in jobs {
                let _ = job.task.await;
            }
        };
        if tokio::time::timeout(SHUTDOWN_TIMEOUT, tasks).await.is_err() {
            tracing::warn!(jobs = ?ids, "Job tasks did not stop within timeout");
        }
    }
}

/// Clears `loading` for the job if it is still set when dropped, so the
/// flag is released even if the job task unwinds.
struct LoadingGuard(JobPublisher);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.update_if(|s| std::mem::replace(&mut s.loading, false));
    }
}

/// Body of a job task: run the workflow, stop the timer, publish the outcome.
async fn run_job(
    provider: Arc<dyn VideoProvider>,
    config: PollerConfig,
    request: GenerationRequest,
    publisher: JobPublisher,
    cancel: CancellationToken,
    outcome_tx: oneshot::Sender<JobOutcome>,
) {
    let job = publisher.job();
    let _loading = LoadingGuard(publisher.clone());
    let timer = TimingTracker::start(publisher.clone(), config.tick_interval, &cancel);

    let mut outcome = execute(provider.as_ref(), &config, &request, &cancel).await;

    let secs = timer.stop(outcome.is_ok()).await;

    let published = publisher.update(|s| {
        s.loading = false;
        match &outcome {
            Ok(url) => {
                s.result_url = Some(url.clone());
                s.error = None;
            }
            Err(e) if e.is_reportable() => s.error = Some(e.to_string()),
            Err(_) => {}
        }
    });
    if !published {
        outcome = Err(JobError::Cancelled);
    }

    match &outcome {
        Ok(url) => tracing::info!(job, secs, url = %url, "Generation job completed"),
        Err(JobError::Cancelled) => tracing::info!(job, secs, "Generation job cancelled"),
        Err(e) => tracing::error!(job, secs, error = %e, "Generation job failed"),
    }

    let _ = outcome_tx.send(outcome);
}

/// Submit -> poll -> retrieve.
async fn execute(
    provider: &dyn VideoProvider,
    config: &PollerConfig,
    request: &GenerationRequest,
    cancel: &CancellationToken,
) -> JobOutcome {
    let handle = submit_with_retry(provider, request, &config.retry, cancel).await?;
    let file_id = poll_until_terminal(
        provider,
        &handle,
        config.poll_interval,
        config.max_poll_attempts,
        cancel,
    )
    .await?;
    fetch_download_url(provider, &file_id, cancel).await
}
