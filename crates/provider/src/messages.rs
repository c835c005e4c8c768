//! Typed request and response bodies for the provider HTTP API.
//!
//! Every response carries a `base_resp` envelope; `status_code == 0`
//! means the provider accepted the call. Optional fields default so that
//! partially-populated bodies still parse and can be classified by the
//! caller.

use reel_core::types::{FileLocation, StatusReport};
use serde::{Deserialize, Serialize};

/// Body of `POST /v1/video_generation`.
#[derive(Debug, Serialize)]
pub struct SubmitRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

/// Common status envelope present in every response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaseResp {
    #[serde(default)]
    pub status_code: i64,
    #[serde(default)]
    pub status_msg: String,
}

impl BaseResp {
    pub fn is_ok(&self) -> bool {
        self.status_code == 0
    }
}

/// Response of `POST /v1/video_generation`.
#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub base_resp: BaseResp,
}

/// Response of `GET /v1/query/video_generation`.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub task_id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default)]
    pub base_resp: BaseResp,
}

impl From<QueryResponse> for StatusReport {
    fn from(resp: QueryResponse) -> Self {
        StatusReport {
            status: resp.status,
            file_id: resp.file_id.filter(|id| !id.trim().is_empty()),
            status_message: resp.base_resp.status_msg,
        }
    }
}

/// The `file` object inside a retrieval response.
#[derive(Debug, Default, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub download_url: Option<String>,
    #[serde(default)]
    pub backup_download_url: Option<String>,
}

/// Response of `GET /v1/files/retrieve`.
#[derive(Debug, Deserialize)]
pub struct RetrieveResponse {
    #[serde(default)]
    pub file: Option<FileObject>,
    #[serde(default)]
    pub base_resp: BaseResp,
}

impl From<RetrieveResponse> for FileLocation {
    fn from(resp: RetrieveResponse) -> Self {
        let file = resp.file.unwrap_or_default();
        FileLocation {
            primary_url: file.download_url,
            backup_url: file.backup_download_url,
            status_message: resp.base_resp.status_msg,
        }
    }
}
