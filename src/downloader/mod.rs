//! Downloader module containing the streaming fetch of a single task.
//!
//! The [`Downloader`] is the piece every worker calls once per task. It owns
//! nothing but a shared HTTP client, the chunk size and the progress
//! reporter, so one instance is cloned into every worker.
//!
//! # Overview
//!
//! - `downloader` - [`Downloader::run`], chunked streaming with progress
//!   reports and cancellation checks before every chunk
//!
//! Most users never build a [`Downloader`] themselves: the
//! [`RunnerBuilder`](crate::RunnerBuilder) creates one for its pool.

pub mod downloader;

pub use downloader::{Downloader, DEFAULT_CHUNK_SIZE};
