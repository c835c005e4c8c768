//! Request, handle and provider-observation types shared by every crate.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Default text-to-video model.
pub const DEFAULT_MODEL: &str = "video-01";

/// A text-to-video generation request. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRequest {
    prompt: String,
    model: String,
}

impl GenerationRequest {
    /// Build a request, rejecting blank prompts and model identifiers.
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Result<Self, CoreError> {
        let prompt = prompt.into().trim().to_string();
        let model = model.into().trim().to_string();

        if prompt.is_empty() {
            return Err(CoreError::Validation("Prompt must not be empty".to_string()));
        }
        if model.is_empty() {
            return Err(CoreError::Validation(
                "Model identifier must not be empty".to_string(),
            ));
        }

        Ok(Self { prompt, model })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Opaque task identifier assigned by the provider on submission.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    /// Wrap a provider task id. Returns `None` for blank ids.
    pub fn new(task_id: impl Into<String>) -> Option<Self> {
        let task_id = task_id.into();
        if task_id.trim().is_empty() {
            None
        } else {
            Some(Self(task_id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One status observation returned by the provider for a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    /// Raw provider status string (e.g. `"Processing"`, `"Success"`).
    pub status: String,
    /// Result file id, present once the job succeeded.
    pub file_id: Option<String>,
    /// Provider status message accompanying the response.
    pub status_message: String,
}

/// Download locations returned by the retrieval endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileLocation {
    pub primary_url: Option<String>,
    pub backup_url: Option<String>,
    pub status_message: String,
}
