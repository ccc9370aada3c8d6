//! Fixed-size worker pool.
//!
//! Every worker is a long-lived Tokio task running the same loop: take the
//! oldest task from the queue, mark it `DOWNLOADING`, hand it to the
//! [`Downloader`], report the terminal state, repeat. Nothing that happens to
//! a single task ends the loop, including a panic in the download or in the
//! reporter; only the pool's shutdown token does.

use crate::downloader::Downloader;
use crate::progress::ProgressEvent;
use crate::queue::TaskQueue;
use crate::task::{Status, Task, TaskId};

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument};

/// Per-task cancellation tokens, keyed by task id.
///
/// A token is registered at submission and retired once the task is terminal.
#[derive(Debug, Default)]
pub(crate) struct Cancellations {
    tokens: Mutex<HashMap<TaskId, CancellationToken>>,
}

impl Cancellations {
    pub(crate) fn register(&self, id: TaskId, token: CancellationToken) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, token);
    }

    pub(crate) fn get(&self, id: TaskId) -> Option<CancellationToken> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&id)
            .cloned()
    }

    /// Cancel a live task. Returns `false` if the id is unknown or retired.
    pub(crate) fn cancel(&self, id: TaskId) -> bool {
        match self.get(id) {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    pub(crate) fn retire(&self, id: TaskId) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&id);
    }
}

/// A running set of workers sharing one queue.
#[derive(Debug)]
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    shutdown: CancellationToken,
}

impl WorkerPool {
    /// Spawn `size` workers on the current Tokio runtime.
    ///
    /// Must be called from within a runtime.
    pub(crate) fn start(
        size: usize,
        queue: Arc<TaskQueue>,
        downloader: Downloader,
        cancellations: Arc<Cancellations>,
        shutdown: CancellationToken,
    ) -> Self {
        info!("Starting {} download workers", size);
        let handles = (0..size)
            .map(|index| {
                let worker = Worker {
                    index,
                    queue: queue.clone(),
                    downloader: downloader.clone(),
                    cancellations: cancellations.clone(),
                    shutdown: shutdown.clone(),
                };
                tokio::spawn(worker.run())
            })
            .collect();

        Self { handles, shutdown }
    }

    /// Number of workers the pool was started with.
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Number of workers whose loop has not exited yet.
    pub fn live_workers(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    /// Signal every worker to stop and wait for them.
    ///
    /// In-flight downloads observe the signal and end `CANCELLED`. Tasks
    /// still queued are left `WAITING`.
    pub async fn shutdown(mut self) {
        self.shutdown.cancel();
        for handle in std::mem::take(&mut self.handles) {
            if let Err(e) = handle.await {
                error!("Download worker ended abnormally: {}", e);
            }
        }
        info!("Download workers stopped");
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Workers must not outlive the pool that owns them.
        self.shutdown.cancel();
    }
}

struct Worker {
    index: usize,
    queue: Arc<TaskQueue>,
    downloader: Downloader,
    cancellations: Arc<Cancellations>,
    shutdown: CancellationToken,
}

impl Worker {
    async fn run(self) {
        debug!("Worker {} started", self.index);
        while let Some(mut task) = self.queue.dequeue_or_cancel(&self.shutdown).await {
            let span = tracing::debug_span!("task", worker = self.index, id = %task.id());
            self.process(&mut task).instrument(span).await;
        }
        debug!("Worker {} stopped", self.index);
    }

    async fn process(&self, task: &mut Task) {
        let id = task.id();
        if let Err(e) = task.transition(Status::Downloading) {
            warn!("Skipping task {}: {}", id, e);
            self.cancellations.retire(id);
            return;
        }

        let cancel = self
            .cancellations
            .get(id)
            .unwrap_or_else(|| self.shutdown.child_token());

        // Covers the reporter as well as the download.
        let outcome = AssertUnwindSafe(async {
            self.report(task);
            self.downloader.run(task, &cancel).await;
        })
        .catch_unwind()
        .await;
        if outcome.is_err() {
            error!("Task {} panicked, marking it failed", id);
            task.force_failed();
        }

        self.cancellations.retire(id);
        if catch_unwind(AssertUnwindSafe(|| self.report(task))).is_err() {
            error!("Reporter panicked on the final report of task {}", id);
        }
    }

    fn report(&self, task: &Task) {
        self.downloader
            .reporter()
            .report(ProgressEvent::from_task(task));
    }
}
