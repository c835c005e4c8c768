use std::time::Duration;

use reel_core::error::CoreError;

/// Default provider API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.minimax.chat";

/// Default per-request HTTP timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Credentials and endpoint settings for the video provider.
///
/// Passed to [`VideoApi::new`](crate::VideoApi::new) explicitly; nothing
/// reads provider credentials from global state.
#[derive(Clone)]
pub struct ProviderConfig {
    /// Bearer API key.
    pub api_key: String,
    /// Account group id, required by the file retrieval endpoint.
    pub group_id: String,
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Timeout applied to every HTTP request.
    pub request_timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, group_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            group_id: group_id.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Override the base URL (trailing slashes are removed).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `REEL_API_KEY`              | required                   |
    /// | `REEL_GROUP_ID`             | required                   |
    /// | `REEL_BASE_URL`             | `https://api.minimax.chat` |
    /// | `REEL_REQUEST_TIMEOUT_SECS` | `30`                       |
    pub fn from_env() -> Result<Self, CoreError> {
        let api_key = std::env::var("REEL_API_KEY")
            .map_err(|_| CoreError::Config("REEL_API_KEY must be set".into()))?;
        let group_id = std::env::var("REEL_GROUP_ID")
            .map_err(|_| CoreError::Config("REEL_GROUP_ID must be set".into()))?;
        let base_url =
            std::env::var("REEL_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());

        let request_timeout =
            request_timeout_from(std::env::var("REEL_REQUEST_TIMEOUT_SECS").ok().as_deref())?;

        Ok(Self {
            request_timeout,
            ..Self::new(api_key, group_id).with_base_url(base_url)
        })
    }

    /// Pre-flight credential check: both the key and group id are present.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty() && !self.group_id.trim().is_empty()
    }
}

/// Parse the request timeout in seconds; unset means the default, zero is rejected.
fn request_timeout_from(raw: Option<&str>) -> Result<Duration, CoreError> {
    let Some(raw) = raw else {
        return Ok(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));
    };
    let secs: u64 = raw.trim().parse().map_err(|_| {
        CoreError::Config(format!(
            "REEL_REQUEST_TIMEOUT_SECS must be a valid u64, got '{raw}'"
        ))
    })?;
    if secs == 0 {
        return Err(CoreError::Config(
            "REEL_REQUEST_TIMEOUT_SECS must be at least 1".into(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"<redacted>")
            .field("group_id", &self.group_id)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
