//! Result retrieval: file id to normalized download URL.

use reel_core::error::JobError;
use reel_core::url::resolve_download_url;
use reel_provider::VideoProvider;
use tokio_util::sync::CancellationToken;

/// Fetch the download locations for `file_id` and pick a normalized URL.
pub async fn fetch_download_url(
    provider: &dyn VideoProvider,
    file_id: &str,
    cancel: &CancellationToken,
) -> Result<String, JobError> {
    let location = tokio::select! {
        biased;
        _ = cancel.cancelled() => return Err(JobError::Cancelled),
        result = provider.retrieve_file(file_id) => {
            result.map_err(|e| JobError::Retrieval(e.to_string()))?
        }
    };

    let url = resolve_download_url(&location)?;
    tracing::info!(file_id, url = %url, "Download URL resolved");
    Ok(url)
}
