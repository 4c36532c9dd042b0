//! Transport utilities shared by the sources.
//!
//! - [`HttpClient`]: reqwest client configured from [`crate::config::HttpConfig`]
//! - [`RetryConfig`] / [`with_retry`]: exponential backoff for transient errors

mod http;
mod retry;

pub use http::HttpClient;
pub use retry::{with_retry, RetryConfig};
