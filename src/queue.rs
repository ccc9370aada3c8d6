//! Unbounded FIFO handoff between submitters and workers.
//!
//! Submitters push without ever blocking; workers await the next task. The
//! receiving half sits behind an async mutex, so concurrent takers are
//! serialized and each task is handed to exactly one of them.
//!
//! ```rust
//! use fetchpool::queue::TaskQueue;
//! use fetchpool::task::{Task, TaskId};
//! use std::path::Path;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let queue = TaskQueue::new();
//! queue.enqueue(Task::new(TaskId(1), "https://example.com/a.bin", Path::new(".")));
//! queue.enqueue(Task::new(TaskId(2), "https://example.com/b.bin", Path::new(".")));
//!
//! assert_eq!(queue.dequeue().await.map(|t| t.id()), Some(TaskId(1)));
//! assert_eq!(queue.dequeue().await.map(|t| t.id()), Some(TaskId(2)));
//! # }
//! ```

use crate::task::Task;

use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shared task queue.
#[derive(Debug)]
pub struct TaskQueue {
    sender: mpsc::UnboundedSender<Task>,
    receiver: Mutex<mpsc::UnboundedReceiver<Task>>,
    pending: AtomicUsize,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            sender,
            receiver: Mutex::new(receiver),
            pending: AtomicUsize::new(0),
        }
    }

    /// Append a task to the tail. Never blocks and never rejects.
    pub fn enqueue(&self, task: Task) {
        debug!("Queueing task {}", task.id());
        self.pending.fetch_add(1, Ordering::SeqCst);
        // The receiver lives in `self`, so the channel cannot be closed here.
        if self.sender.send(task).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
    }

    /// Wait for the oldest un-taken task and remove it.
    ///
    /// Returns `None` only if the channel has been closed, which cannot
    /// happen while the queue is alive.
    pub async fn dequeue(&self) -> Option<Task> {
        let task = self.receiver.lock().await.recv().await;
        if task.is_some() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
        }
        task
    }

    /// Like [`dequeue`](Self::dequeue), but gives up as soon as `cancel` fires.
    ///
    /// A task is never lost to cancellation: either it is returned, or it
    /// stays in the queue.
    pub async fn dequeue_or_cancel(&self, cancel: &CancellationToken) -> Option<Task> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => None,
            task = self.dequeue() => task,
        }
    }

    /// Number of tasks waiting to be taken.
    pub fn len(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Returns `true` when no task is waiting.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
