//! REST client for the provider's video generation endpoints.
//!
//! Wraps job submission, status queries and file retrieval using
//! [`reqwest`]. Every request is authenticated with the configured bearer
//! key and bounded by the configured request timeout.

use reel_core::types::{FileLocation, GenerationRequest, JobHandle, StatusReport};

use crate::config::ProviderConfig;
use crate::messages::{QueryResponse, RetrieveResponse, SubmitRequest, SubmitResponse};

/// HTTP client for a single provider account.
pub struct VideoApi {
    client: reqwest::Client,
    config: ProviderConfig,
}

/// Errors from the provider REST API layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A 2xx response whose `base_resp` reported a failure.
    #[error("Provider rejected request ({code}): {message}")]
    Provider { code: i64, message: String },

    /// A 2xx submission response without a task id.
    #[error("Provider response did not include a task id")]
    MissingTaskId,
}

impl VideoApi {
    /// Create a client with its own connection pool.
    pub fn new(config: ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    ///
    /// The caller's client keeps its own timeout settings.
    pub fn with_client(client: reqwest::Client, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    /// Submit a generation job.
    ///
    /// Sends `POST /v1/video_generation` and returns the provider task id.
    pub async fn submit_generation(
        &self,
        request: &GenerationRequest,
    ) -> Result<JobHandle, ProviderError> {
        let body = SubmitRequest {
            model: request.model(),
            prompt: request.prompt(),
        };

        let response = self
            .client
            .post(format!("{}/v1/video_generation", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: SubmitResponse = Self::parse_response(response).await?;

        if !parsed.base_resp.is_ok() {
            return Err(ProviderError::Provider {
                code: parsed.base_resp.status_code,
                message: parsed.base_resp.status_msg,
            });
        }

        let handle = parsed
            .task_id
            .and_then(JobHandle::new)
            .ok_or(ProviderError::MissingTaskId)?;

        tracing::debug!(task_id = %handle, model = request.model(), "Generation submitted");
        Ok(handle)
    }

    /// Query the status of a submitted task.
    ///
    /// Sends `GET /v1/query/video_generation?task_id=...`.
    pub async fn query_generation(
        &self,
        handle: &JobHandle,
    ) -> Result<StatusReport, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/query/video_generation", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .query(&[("task_id", handle.as_str())])
            .send()
            .await?;

        let parsed: QueryResponse = Self::parse_response(response).await?;
        Ok(parsed.into())
    }

    /// Look up the download locations of a generated file.
    ///
    /// Sends `GET /v1/files/retrieve?GroupId=...&file_id=...`.
    pub async fn retrieve_file(&self, file_id: &str) -> Result<FileLocation, ProviderError> {
        let response = self
            .client
            .get(format!("{}/v1/files/retrieve", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("GroupId", self.config.group_id.as_str()),
                ("file_id", file_id),
            ])
            .send()
            .await?;

        let parsed: RetrieveResponse = Self::parse_response(response).await?;
        Ok(parsed.into())
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code, capturing the body
    /// of failed responses.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
