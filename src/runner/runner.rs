//! The submission side of the pool.
//!
//! [`TaskRunner`] hands out task ids, builds each task's destination from the
//! configured directory, and pushes the task onto the queue its worker pool
//! drains.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::progress::{channel, format_percent};
//! use fetchpool::RunnerBuilder;
//! use std::path::PathBuf;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fetchpool::Error> {
//! let (reporter, mut feed) = channel();
//! let runner = RunnerBuilder::new()
//!     .directory(PathBuf::from("downloads"))
//!     .workers(3)
//!     .build(reporter)?;
//!
//! let task = runner.submit("https://example.com/file.zip");
//! println!("queued {} as {}", task.filename(), task.id());
//!
//! while let Some(event) = feed.recv().await {
//!     println!("{} {} {}", event.task_id, event.status, format_percent(event.progress));
//!     if event.status.is_terminal() {
//!         break;
//!     }
//! }
//! runner.shutdown().await;
//! # Ok(())
//! # }
//! ```

use super::config::RunnerConfig;
use super::pool::{Cancellations, WorkerPool};
use crate::downloader::Downloader;
use crate::queue::TaskQueue;
use crate::task::{Task, TaskId};

use reqwest::header::HeaderMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Accepts URLs and feeds them to a running worker pool.
///
/// Created via [`RunnerBuilder`](super::RunnerBuilder).
pub struct TaskRunner {
    config: RunnerConfig,
    queue: Arc<TaskQueue>,
    cancellations: Arc<Cancellations>,
    shutdown: CancellationToken,
    next_id: AtomicU64,
    pool: WorkerPool,
}

impl fmt::Debug for TaskRunner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRunner")
            .field("config", &self.config)
            .field("pending", &self.queue.len())
            .field("pool", &self.pool)
            .finish()
    }
}

impl TaskRunner {
    pub(crate) fn start(config: RunnerConfig, downloader: Downloader) -> Self {
        let queue = Arc::new(TaskQueue::new());
        let cancellations = Arc::new(Cancellations::default());
        let shutdown = CancellationToken::new();
        let pool = WorkerPool::start(
            config.workers,
            queue.clone(),
            downloader,
            cancellations.clone(),
            shutdown.clone(),
        );

        Self {
            config,
            queue,
            cancellations,
            shutdown,
            next_id: AtomicU64::new(1),
            pool,
        }
    }

    /// Queue a URL for download and return the new task.
    ///
    /// The task is `WAITING`, carries the next id, and will be written to the
    /// configured directory under the URL's last path segment. The URL is not
    /// validated here. The returned value is a snapshot for display: progress
    /// arrives through the reporter.
    pub fn submit(&self, url: impl Into<String>) -> Task {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = Task::new(id, url, &self.config.directory);
        debug!("Submitted {} as task {}", task.url(), id);

        self.cancellations.register(id, self.shutdown.child_token());
        let snapshot = task.clone();
        self.queue.enqueue(task);
        snapshot
    }

    /// Ask a task to stop.
    ///
    /// A downloading task ends `CANCELLED` at its next chunk. A task still
    /// queued is dispatched as usual and ends `CANCELLED` without fetching.
    /// Returns `false` when the id is unknown or the task has already been
    /// retired by its worker.
    pub fn cancel(&self, id: TaskId) -> bool {
        let cancelled = self.cancellations.cancel(id);
        if cancelled {
            debug!("Cancellation requested for task {}", id);
        }
        cancelled
    }

    /// Stop every worker and wait for them.
    ///
    /// In-flight downloads end `CANCELLED`; queued tasks stay `WAITING` and
    /// are dropped with the runner.
    pub async fn shutdown(self) {
        self.pool.shutdown().await;
    }

    /// Gets the directory where files will be downloaded.
    pub fn directory(&self) -> &PathBuf {
        &self.config.directory
    }

    /// Gets the number of workers.
    pub fn workers(&self) -> usize {
        self.config.workers
    }

    /// Gets the chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Gets the custom headers.
    pub fn headers(&self) -> Option<&HeaderMap> {
        self.config.headers.as_ref()
    }

    /// Number of submitted tasks no worker has taken yet.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of workers still running.
    pub fn live_workers(&self) -> usize {
        self.pool.live_workers()
    }
}
