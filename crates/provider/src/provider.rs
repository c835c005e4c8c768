//! The provider seam the poller is written against.

use async_trait::async_trait;
use reel_core::types::{FileLocation, GenerationRequest, JobHandle, StatusReport};

use crate::api::{ProviderError, VideoApi};

/// A text-to-video provider that runs jobs asynchronously.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    /// Cheap pre-flight check, consulted before the first submission.
    fn validate_credentials(&self) -> bool;

    /// Submit a job and return its task handle.
    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ProviderError>;

    /// Fetch the current status of a task.
    async fn query_status(&self, handle: &JobHandle) -> Result<StatusReport, ProviderError>;

    /// Resolve a result file id into its download locations.
    async fn retrieve_file(&self, file_id: &str) -> Result<FileLocation, ProviderError>;
}

#[async_trait]
impl VideoProvider for VideoApi {
    fn validate_credentials(&self) -> bool {
        self.config().has_credentials()
    }

    async fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ProviderError> {
        self.submit_generation(request).await
    }

    async fn query_status(&self, handle: &JobHandle) -> Result<StatusReport, ProviderError> {
        self.query_generation(handle).await
    }

    async fn retrieve_file(&self, file_id: &str) -> Result<FileLocation, ProviderError> {
        VideoApi::retrieve_file(self, file_id).await
    }
}
