//! Shared fixtures for poller integration tests.
//!
//! [`ScriptedProvider`] answers each call from a per-endpoint queue and
//! falls back to a benign default once the queue is empty, counting every
//! call it receives.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use reel_core::types::{FileLocation, GenerationRequest, JobHandle, StatusReport};
use reel_provider::{ProviderError, VideoProvider};

pub const DEFAULT_TASK_ID: &str = "task-1";
pub const DEFAULT_URL: &str = "https://cdn.example.com/video.mp4";

pub struct ScriptedProvider {
    credentials_ok: AtomicBool,
    submits: Mutex<VecDeque<Result<JobHandle, ProviderError>>>,
    statuses: Mutex<VecDeque<Result<StatusReport, ProviderError>>>,
    retrievals: Mutex<VecDeque<Result<FileLocation, ProviderError>>>,
    submit_calls: AtomicU32,
    status_calls: AtomicU32,
    retrieve_calls: AtomicU32,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            credentials_ok: AtomicBool::new(true),
            submits: Mutex::new(VecDeque::new()),
            statuses: Mutex::new(VecDeque::new()),
            retrievals: Mutex::new(VecDeque::new()),
            submit_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            retrieve_calls: AtomicU32::new(0),
        }
    }

    pub fn set_credentials(&self, ok: bool) {
        self.credentials_ok.store(ok, Ordering::SeqCst);
    }

    pub fn push_submit(&self, result: Result<JobHandle, ProviderError>) {
        self.submits.lock().unwrap().push_back(result);
    }

    pub fn push_status(&self, result: Result<StatusReport, ProviderError>) {
        self.statuses.lock().unwrap().push_back(result);
    }

    pub fn push_retrieval(&self, result: Result<FileLocation, ProviderError>) {
        self.retrievals.lock().unwrap().push_back(result);
    }

    pub fn submit_calls(&self) -> u32 {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn retrieve_calls(&self) -> u32 {
        self.retrieve_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoProvider for ScriptedProvider {
    fn validate_credentials(&self) -> bool {
        self.credentials_ok.load(Ordering::SeqCst)
    }

    async fn submit(&self, _request: &GenerationRequest) -> Result<JobHandle, ProviderError> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        self.submits
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(handle(DEFAULT_TASK_ID)))
    }

    async fn query_status(&self, _handle: &JobHandle) -> Result<StatusReport, ProviderError> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status("Processing")))
    }

    async fn retrieve_file(&self, _file_id: &str) -> Result<FileLocation, ProviderError> {
        self.retrieve_calls.fetch_add(1, Ordering::SeqCst);
        self.retrievals
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(location(Some(DEFAULT_URL), None)))
    }
}

pub fn handle(task_id: &str) -> JobHandle {
    JobHandle::new(task_id).unwrap()
}

pub fn request(prompt: &str) -> GenerationRequest {
    GenerationRequest::new(prompt, "video-01").unwrap()
}

pub fn status(status: &str) -> StatusReport {
    StatusReport {
        status: status.to_string(),
        file_id: None,
        status_message: "success".to_string(),
    }
}

pub fn success(file_id: &str) -> StatusReport {
    StatusReport {
        status: "Success".to_string(),
        file_id: Some(file_id.to_string()),
        status_message: "success".to_string(),
    }
}

pub fn location(primary: Option<&str>, backup: Option<&str>) -> FileLocation {
    FileLocation {
        primary_url: primary.map(str::to_string),
        backup_url: backup.map(str::to_string),
        status_message: "success".to_string(),
    }
}

pub fn http_error(status: u16) -> ProviderError {
    ProviderError::Api {
        status,
        body: format!("upstream returned {status}"),
    }
}
