//! fetchpool queues URLs and streams them to disk with a fixed pool of
//! download workers, reporting every task's status and progress as it goes.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use fetchpool::progress::{channel, StyleOptions, TaskBoard};
//! use fetchpool::{Error, RunnerBuilder};
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Error> {
//! let (reporter, feed) = channel();
//! let runner = RunnerBuilder::new()
//!     .directory(PathBuf::from("output"))
//!     .workers(5)
//!     .build(reporter)?;
//!
//! let mut board = TaskBoard::new(StyleOptions::default());
//! board.add(&runner.submit("https://github.com/seanmonstar/reqwest/archive/refs/tags/v0.11.9.zip"));
//!
//! let drawing = tokio::spawn(async move {
//!     board.drain(feed).await;
//!     board
//! });
//! # runner.shutdown().await;
//! # let _ = drawing.await;
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`task`] - the `Task` record, its id and its forward-only `Status`
//! - [`queue`] - the unbounded FIFO queue workers take tasks from
//! - [`downloader`] - chunked streaming of one task to its destination file
//! - [`runner`] - submission, the worker pool, builder and configuration
//! - [`progress`] - the reporter boundary, its channel, and a terminal task board
//! - [`http`] - HTTP client creation
//! - [`error`] - centralized error handling with the `Error` enum
//! - [`utils`] - shared utility functions

pub mod downloader;
pub mod error;
pub mod http;
pub mod progress;
pub mod queue;
pub mod runner;
pub mod task;
pub mod utils;

pub use downloader::{Downloader, DEFAULT_CHUNK_SIZE};
pub use error::{Error, Result};
pub use http::{create_http_client, HttpClientConfig};
pub use progress::{
    channel, format_percent, ProgressBarOpts, ProgressEvent, ProgressFeed, Reporter,
    StyleOptions, TaskBoard,
};
pub use queue::TaskQueue;
pub use runner::{RunnerBuilder, RunnerConfig, TaskRunner, WorkerPool, DEFAULT_WORKERS};
pub use task::{Status, Task, TaskId};
pub use utils::filename_from_url;
