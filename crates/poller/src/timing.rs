//! Elapsed/total time tracking for the active job.
//!
//! Purely observational: the tracker republishes elapsed seconds on its
//! own cadence and never influences the job state machine.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::state::JobPublisher;

/// Cadence of elapsed-time updates.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Running timer for one job.
///
/// Dropping the tracker without calling [`stop`](Self::stop) still
/// cancels the ticking task.
pub struct TimingTracker {
    started: Instant,
    publisher: JobPublisher,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TimingTracker {
    /// Record the start instant and spawn the ticking task.
    ///
    /// The ticker stops when [`stop`](Self::stop) is called, when `parent`
    /// is cancelled, or when the job loses ownership of the snapshot.
    pub fn start(publisher: JobPublisher, tick: Duration, parent: &CancellationToken) -> Self {
        let started = Instant::now();
        let cancel = parent.child_token();

        publisher.update(|s| {
            s.elapsed_secs = 0;
            s.total_secs = None;
        });

        let task = tokio::spawn(run_ticker(publisher.clone(), started, tick, cancel.clone()));

        Self {
            started,
            publisher,
            cancel,
            task: Some(task),
        }
    }

    /// Stop ticking and freeze the elapsed time.
    ///
    /// Publishes the final duration as `total_secs` only when `success`.
    /// Returns the final duration in whole seconds.
    pub async fn stop(mut self, success: bool) -> u64 {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }

        let secs = self.started.elapsed().as_secs();
        self.publisher.update(|s| {
            s.elapsed_secs = secs;
            if success {
                s.total_secs = Some(secs);
            }
        });

        tracing::debug!(job = self.publisher.job(), secs, success, "Job timer stopped");
        secs
    }
}

impl Drop for TimingTracker {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn run_ticker(
    publisher: JobPublisher,
    started: Instant,
    tick: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval_at(started + tick, tick);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {
                let secs = started.elapsed().as_secs();
                if !publisher.update_if(|s| {
                    let changed = s.elapsed_secs != secs;
                    s.elapsed_secs = secs;
                    changed
                }) && !publisher.is_current()
                {
                    tracing::debug!(job = publisher.job(), "Job superseded, timer exiting");
                    break;
                }
            }
        }
    }
}
