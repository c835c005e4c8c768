/// General-purpose errors for request construction and configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Terminal failure of a single generation job.
///
/// Every variant renders as one human-readable message, which is what the
/// poller publishes to observers.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    /// Provider credentials failed the pre-flight check.
    #[error("Provider credentials are missing or invalid")]
    Credential,

    /// Every submission attempt failed.
    #[error("Submission failed after {retries} retries ({attempts} attempts): {reason}")]
    Submission {
        retries: u32,
        attempts: u32,
        reason: String,
    },

    /// A status query failed or the provider reported a failed job.
    #[error("Generation failed: {0}")]
    Poll(String),

    /// The provider reported success without a result file.
    #[error("Provider reported success but returned no file id")]
    MalformedSuccess,

    /// The job never reached a terminal status.
    #[error("Generation timed out after {attempts} status checks")]
    Timeout { attempts: u32 },

    /// The download location could not be resolved.
    #[error("Failed to retrieve result: {0}")]
    Retrieval(String),

    /// The job was cancelled or superseded by a newer job.
    #[error("Generation cancelled")]
    Cancelled,
}

impl JobError {
    /// Whether this outcome should be shown to observers as an error.
    pub fn is_reportable(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}
