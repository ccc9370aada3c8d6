//! The boundary between worker tasks and the presentation layer.
//!
//! Workers call [`Reporter::report`] from many tasks at once. An implementation
//! must tolerate that and must hand the event off without doing real work on
//! the caller's side. The recommended one is [`channel`]: workers push into an
//! unbounded channel and a single consumer owned by the presentation layer
//! drains it, so display state is only ever touched from one place.
//!
//! # Examples
//!
//! ## Single consumer channel
//!
//! ```rust
//! use fetchpool::progress::{channel, ProgressEvent, Reporter};
//! use fetchpool::task::{Status, TaskId};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (reporter, mut feed) = channel();
//! reporter.report(ProgressEvent::new(TaskId(1), Status::Downloading, 0.0));
//! drop(reporter);
//!
//! let event = feed.recv().await.unwrap();
//! assert_eq!(event.status, Status::Downloading);
//! assert!(feed.recv().await.is_none());
//! # }
//! ```
//!
//! ## Closure
//!
//! ```rust
//! use fetchpool::progress::{ProgressEvent, Reporter};
//!
//! let reporter = |event: &ProgressEvent| {
//!     println!("{} {} {:.2}%", event.task_id, event.status, event.progress);
//! };
//! # let _ = &reporter as &dyn Reporter;
//! ```

use crate::task::{Status, Task, TaskId};

use tokio::sync::mpsc;

/// One status/progress update for one task.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent {
    /// Task the update is about.
    pub task_id: TaskId,
    /// Status at the time of the update.
    pub status: Status,
    /// Completion percentage at the time of the update.
    pub progress: f64,
}

impl ProgressEvent {
    /// Create a new [`ProgressEvent`].
    pub fn new(task_id: TaskId, status: Status, progress: f64) -> Self {
        Self {
            task_id,
            status,
            progress,
        }
    }

    /// Snapshot the current state of a task.
    pub fn from_task(task: &Task) -> Self {
        Self::new(task.id(), task.status(), task.progress())
    }
}

/// Receives status and progress updates from worker tasks.
pub trait Reporter: Send + Sync {
    /// Relay one update. Must be cheap and must not block.
    fn report(&self, event: ProgressEvent);
}

impl<F> Reporter for F
where
    F: Fn(&ProgressEvent) + Send + Sync,
{
    fn report(&self, event: ProgressEvent) {
        self(&event)
    }
}

/// Reporter that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReporter;

impl Reporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

/// Producer side of [`channel`].
#[derive(Debug, Clone)]
pub struct ChannelReporter {
    sender: mpsc::UnboundedSender<ProgressEvent>,
}

impl Reporter for ChannelReporter {
    fn report(&self, event: ProgressEvent) {
        // A gone consumer means nobody is watching anymore.
        let _ = self.sender.send(event);
    }
}

/// Consumer side of [`channel`], owned by the presentation layer.
#[derive(Debug)]
pub struct ProgressFeed {
    receiver: mpsc::UnboundedReceiver<ProgressEvent>,
}

impl ProgressFeed {
    /// Wait for the next event. Returns `None` once every reporter is dropped.
    pub async fn recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.recv().await
    }

    /// Take an event if one is ready, without waiting.
    pub fn try_recv(&mut self) -> Option<ProgressEvent> {
        self.receiver.try_recv().ok()
    }
}

/// Create a single consumer progress channel.
pub fn channel() -> (ChannelReporter, ProgressFeed) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ChannelReporter { sender }, ProgressFeed { receiver })
}
