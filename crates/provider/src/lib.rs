//! HTTP client for the text-to-video generation provider.
//!
//! Provides the [`VideoProvider`] trait the poller is written against,
//! the `reqwest`-backed [`VideoApi`] implementation, typed wire messages
//! and the provider configuration.

pub mod api;
pub mod config;
pub mod messages;
pub mod provider;

pub use api::{ProviderError, VideoApi};
pub use config::ProviderConfig;
pub use provider::VideoProvider;
