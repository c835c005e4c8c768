//! Observable generation state.
//!
//! The poller owns a single [`watch::Sender`] of [`GenerationSnapshot`].
//! Each job writes through a [`JobPublisher`] bound to its job id; writes
//! from a job that is no longer current are discarded inside the channel
//! lock, so a superseded job can never touch the snapshot of its successor.

use std::sync::Arc;

use reel_core::types::Timestamp;
use serde::Serialize;
use tokio::sync::watch;

/// Everything an observer (UI, CLI) needs to render the current job.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationSnapshot {
    /// Id of the job this snapshot belongs to; 0 before the first job.
    pub job: u64,
    /// Prompt text currently entered or submitted.
    pub prompt: String,
    /// Normalized download URL once the job succeeded.
    pub result_url: Option<String>,
    /// True while a job is in flight.
    pub loading: bool,
    /// Terminal error message, if the job failed.
    pub error: Option<String>,
    /// Whole seconds since the job started.
    pub elapsed_secs: u64,
    /// Total generation time; set only when the job succeeded.
    pub total_secs: Option<u64>,
    /// When the job was started.
    pub started_at: Option<Timestamp>,
}

pub(crate) type SharedState = Arc<watch::Sender<GenerationSnapshot>>;

/// Write access to the snapshot on behalf of one job.
#[derive(Clone)]
pub struct JobPublisher {
    state: SharedState,
    job: u64,
}

impl JobPublisher {
    pub(crate) fn new(state: SharedState, job: u64) -> Self {
        Self { state, job }
    }

    pub fn job(&self) -> u64 {
        self.job
    }

    /// Whether this job still owns the snapshot.
    pub fn is_current(&self) -> bool {
        self.state.borrow().job == self.job
    }

    /// Apply `f` if this job is still current. Returns whether it was applied.
    pub fn update(&self, f: impl FnOnce(&mut GenerationSnapshot)) -> bool {
        self.update_if(|snapshot| {
            f(snapshot);
            true
        })
    }

    /// Like [`update`](Self::update), but `f` reports whether it changed
    /// anything; subscribers are only notified when it did.
    pub fn update_if(&self, f: impl FnOnce(&mut GenerationSnapshot) -> bool) -> bool {
        let job = self.job;
        self.state.send_if_modified(|snapshot| {
            if snapshot.job != job {
                return false;
            }
            f(snapshot)
        })
    }
}
