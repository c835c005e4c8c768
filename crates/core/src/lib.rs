//! Domain types and pure logic for the Reel video-generation poller.
//!
//! Nothing in this crate performs I/O. The HTTP client lives in
//! `reel-provider` and the async orchestration in `reel-poller`.

pub mod error;
pub mod poll;
pub mod retry;
pub mod status;
pub mod types;
pub mod url;
