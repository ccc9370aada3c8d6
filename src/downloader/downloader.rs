//! Streaming fetch of a single task.
//!
//! [`Downloader::run`] takes a task that a worker owns, streams the URL's body
//! to the task's destination in fixed-size chunks, and reports progress after
//! every chunk when the total size is known. It never returns an error: every
//! failure is folded into the task's terminal status, logged, and reported.
//!
//! # Examples
//!
//! ```rust,no_run
//! use fetchpool::downloader::Downloader;
//! use fetchpool::http::{create_http_client, HttpClientConfig};
//! use fetchpool::progress::{ProgressEvent, Reporter};
//! use fetchpool::task::{Task, TaskId};
//! use std::path::Path;
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = create_http_client(HttpClientConfig::default())?;
//! let reporter: Arc<dyn Reporter> = Arc::new(|event: &ProgressEvent| {
//!     println!("{} {} {:.2}%", event.task_id, event.status, event.progress);
//! });
//! let downloader = Downloader::new(client, 4096, reporter);
//!
//! let mut task = Task::new(TaskId(1), "https://example.com/file.zip", Path::new("downloads"));
//! downloader.run(&mut task, &CancellationToken::new()).await;
//! println!("{}", task.status());
//! # Ok(())
//! # }
//! ```

use crate::error::{Error, Result};
use crate::progress::{ProgressEvent, Reporter};
use crate::task::{Status, Task};
use crate::utils::{advertised_length, percent_of};

use futures::TryStreamExt;
use reqwest_middleware::ClientWithMiddleware;
use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::{
    fs::{self, OpenOptions},
    io::{AsyncReadExt, AsyncWriteExt},
};
use tokio_util::{io::StreamReader, sync::CancellationToken};
use tracing::{debug, warn};

/// Bytes read from the network and written to disk per step.
pub const DEFAULT_CHUNK_SIZE: usize = 1024;

/// Performs one streaming fetch per call.
///
/// Cloning is cheap: the HTTP client and the reporter are shared.
#[derive(Clone)]
pub struct Downloader {
    client: ClientWithMiddleware,
    chunk_size: usize,
    reporter: Arc<dyn Reporter>,
}

impl fmt::Debug for Downloader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Downloader")
            .field("chunk_size", &self.chunk_size)
            .finish()
    }
}

impl Downloader {
    /// Creates a new Downloader.
    ///
    /// A zero `chunk_size` is raised to one byte.
    pub fn new(
        client: ClientWithMiddleware,
        chunk_size: usize,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            client,
            chunk_size: chunk_size.max(1),
            reporter,
        }
    }

    /// Gets the chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Gets the reporter events are sent to.
    pub fn reporter(&self) -> &Arc<dyn Reporter> {
        &self.reporter
    }

    /// Download `task` and leave it in a terminal status.
    ///
    /// The task is expected to be `DOWNLOADING` already. A `WAITING` task is
    /// moved there first and that step is reported as well. The terminal
    /// status is always reported before returning: `DONE` with progress at
    /// 100, `FAILED` after any connection, transfer or local I/O error, or
    /// `CANCELLED` once `cancel` fires. A partially written file is left on
    /// disk.
    pub async fn run(&self, task: &mut Task, cancel: &CancellationToken) {
        if task.status() == Status::Waiting && task.transition(Status::Downloading).is_ok() {
            self.report(task);
        }

        let outcome = self.fetch(task, cancel).await;
        let next = match &outcome {
            Ok(()) => {
                debug!("Finished {} into {:?}", task.url(), task.destination());
                task.set_progress(100.0);
                Status::Done
            }
            Err(Error::Cancelled) => {
                debug!("Cancelled {}", task.url());
                Status::Cancelled
            }
            Err(e) => {
                warn!(task = %task.id(), url = task.url(), error = ?e, "Download failed: {}", e);
                e.terminal_status()
            }
        };

        if let Err(e) = task.transition(next) {
            warn!(task = %task.id(), "{}", e);
            task.force_failed();
        }
        self.report(task);
    }

    fn report(&self, task: &Task) {
        self.reporter.report(ProgressEvent::from_task(task));
    }

    /// Fetches the file and writes it to disk chunk by chunk.
    async fn fetch(&self, task: &mut Task, cancel: &CancellationToken) -> Result<()> {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }

        debug!("Fetching {}", task.url());
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(Error::Cancelled),
            res = self.client.get(task.url()).send() => res.map_err(|source| Error::Connection {
                url: task.url().to_string(),
                source,
            })?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: task.url().to_string(),
                status,
            });
        }

        let total = advertised_length(&response);
        debug!("Advertised size of {}: {:?}", task.url(), total);

        // Prepare the destination directory/file.
        let output = task.destination().to_path_buf();
        if let Some(output_dir) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            debug!("Creating destination directory {:?}", output_dir);
            fs::create_dir_all(output_dir).await?;
        }

        debug!("Creating destination file {:?}", &output);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&output)
            .await?;

        let mut reader = StreamReader::new(response.bytes_stream().map_err(io::Error::other));
        let mut chunk = vec![0u8; self.chunk_size];
        let mut transferred: u64 = 0;

        debug!("Retrieving chunks...");
        loop {
            if cancel.is_cancelled() {
                return Err(Error::Cancelled);
            }
            let read = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(Error::Cancelled),
                read = reader.read(&mut chunk) => read.map_err(|source| Error::Transfer { source })?,
            };
            if read == 0 {
                break;
            }

            file.write_all(&chunk[..read]).await?;
            transferred += read as u64;

            if let Some(total) = total {
                if task.set_progress(percent_of(transferred, total)) {
                    self.report(task);
                }
            }
        }

        file.flush().await?;
        debug!("Wrote {} bytes to {:?}", transferred, &output);
        Ok(())
    }
}
