//! Asynchronous generation job poller.
//!
//! [`JobPoller`] submits a text-to-video job, polls it to a terminal
//! state, resolves the download URL and publishes progress through a
//! [`tokio::sync::watch`] channel of [`GenerationSnapshot`]s. One job is
//! active per poller; starting another cancels the previous one.

pub mod config;
pub mod poller;
pub mod retrieve;
pub mod state;
pub mod status;
pub mod submit;
pub mod timing;

pub use config::PollerConfig;
pub use poller::{JobPoller, JobTicket};
pub use state::GenerationSnapshot;
