//! `reel` -- run one text-to-video generation from the command line.
//!
//! Submits the prompt given as arguments, logs progress while the job is
//! polled, and prints the download URL on success. Ctrl-C cancels the
//! running job.
//!
//! # Environment variables
//!
//! | Variable                    | Required | Default                    | Description                      |
//! |-----------------------------|----------|----------------------------|----------------------------------|
//! | `REEL_API_KEY`              | yes      | --                         | Provider API key (bearer token)  |
//! | `REEL_GROUP_ID`             | yes      | --                         | Provider group id for retrieval  |
//! | `REEL_BASE_URL`             | no       | `https://api.minimax.chat` | Provider base URL                |
//! | `REEL_REQUEST_TIMEOUT_SECS` | no       | `30`                       | Per-request HTTP timeout         |
//! | `REEL_MODEL`                | no       | `video-01`                 | Generation model                 |
//! | `REEL_POLL_INTERVAL_SECS`   | no       | `5`                        | Seconds between status polls     |
//! | `REEL_MAX_POLL_ATTEMPTS`    | no       | `60`                       | Polls before the job times out   |
//! | `REEL_SUBMIT_RETRIES`       | no       | `3`                        | Submission retries               |
//! | `REEL_RETRY_DELAY_SECS`     | no       | `2`                        | Seconds between submission tries |

use std::sync::Arc;

use anyhow::{bail, Context};
use reel_core::error::JobError;
use reel_poller::{GenerationSnapshot, JobPoller, PollerConfig};
use reel_provider::{ProviderConfig, VideoApi};
use tokio::sync::watch;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "reel=info,reel_poller=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let prompt = std::env::args().skip(1).collect::<Vec<_>>().join(" ");
    if prompt.trim().is_empty() {
        bail!("usage: reel <prompt>");
    }

    let provider_config = ProviderConfig::from_env().context("invalid provider configuration")?;
    let poller_config = PollerConfig::from_env().context("invalid poller configuration")?;
    let base_url = provider_config.base_url.clone();

    let api = VideoApi::new(provider_config).context("failed to build HTTP client")?;
    let poller = JobPoller::new(Arc::new(api), poller_config);

    let config = poller.config();
    tracing::info!(
        base_url = %base_url,
        model = %config.model,
        poll_interval_secs = config.poll_interval.as_secs(),
        max_poll_attempts = config.max_poll_attempts,
        "Starting reel",
    );

    let request = poller.request(prompt)?;
    let progress = tokio::spawn(report_progress(poller.subscribe()));

    let ticket = poller.start(request).await;
    let job = ticket.job();
    let outcome = ticket.outcome();
    tokio::pin!(outcome);

    let outcome = tokio::select! {
        outcome = &mut outcome => outcome,
        _ = tokio::signal::ctrl_c() => {
            tracing::warn!(job, "Interrupted, cancelling job");
            poller.cancel().await;
            outcome.await
        }
    };

    poller.shutdown().await;
    progress.abort();

    match outcome {
        Ok(url) => {
            let snapshot = poller.snapshot();
            tracing::info!(job, total_secs = ?snapshot.total_secs, "Video ready");
            println!("{url}");
            Ok(())
        }
        Err(JobError::Cancelled) => {
            tracing::info!(job, "Job cancelled");
            Ok(())
        }
        Err(e) => Err(e).context("video generation failed"),
    }
}

/// Log elapsed time once per change while the job is loading.
async fn report_progress(mut rx: watch::Receiver<GenerationSnapshot>) {
    while rx.changed().await.is_ok() {
        let snapshot = rx.borrow_and_update().clone();
        if snapshot.loading {
            tracing::info!(
                job = snapshot.job,
                elapsed_secs = snapshot.elapsed_secs,
                "Generating video",
            );
        }
    }
}
