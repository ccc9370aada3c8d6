//! HTTP module containing HTTP client functionality.
//!
//! - [`client`] - shared client creation and middleware configuration

pub mod client;

pub use client::{create_http_client, HttpClientConfig, DEFAULT_USER_AGENT};
