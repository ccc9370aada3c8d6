//! Runner module: task submission, the worker pool, and their configuration.
//!
//! # Overview
//!
//! - `runner` - [`TaskRunner`], the submission interface (`submit`, `cancel`, `shutdown`)
//! - `pool` - [`WorkerPool`], the fixed set of long-lived workers
//! - `builder` - [`RunnerBuilder`] for configuring and starting a runner
//! - `config` - [`RunnerConfig`] and its defaults
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::progress::{channel, StyleOptions, TaskBoard};
//! use fetchpool::RunnerBuilder;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fetchpool::Error> {
//! let (reporter, feed) = channel();
//! let runner = RunnerBuilder::new().workers(5).build(reporter)?;
//!
//! let mut board = TaskBoard::new(StyleOptions::default());
//! for url in ["https://example.com/a.zip", "https://example.com/b.zip"] {
//!     board.add(&runner.submit(url));
//! }
//! # runner.shutdown().await;
//! # board.drain(feed).await;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod config;
pub mod pool;
pub mod runner;

pub use builder::RunnerBuilder;
pub use config::{RunnerConfig, DEFAULT_WORKERS};
pub use pool::WorkerPool;
pub use runner::TaskRunner;
