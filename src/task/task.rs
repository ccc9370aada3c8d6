//! The unit of work handed from the submitter to a worker.
//!
//! ```rust
//! use fetchpool::task::{Status, Task, TaskId};
//! use std::path::Path;
//!
//! let task = Task::new(TaskId(1), "https://example.com/files/report.pdf", Path::new("downloads"));
//! assert_eq!(task.filename(), "report.pdf");
//! assert_eq!(task.destination(), Path::new("downloads/report.pdf"));
//! assert_eq!(task.status(), Status::Waiting);
//! ```

use super::status::Status;
use crate::error::{Error, Result};
use crate::utils::filename_from_url;

use std::fmt;
use std::path::{Path, PathBuf};

/// Stable handle of a task, assigned at submission and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One URL-to-file download.
///
/// The identity fields never change. `status` and `progress` are only mutated
/// by whoever owns the value: the queue moves it to exactly one worker, so no
/// lock guards them.
#[derive(Debug, Clone)]
pub struct Task {
    id: TaskId,
    url: String,
    filename: String,
    destination: PathBuf,
    status: Status,
    progress: f64,
}

impl Task {
    /// Creates a [`Task`] in the `WAITING` state.
    ///
    /// The URL is not validated; a malformed one only surfaces as `FAILED`
    /// once a worker tries to fetch it.
    pub fn new(id: TaskId, url: impl Into<String>, directory: &Path) -> Self {
        let url = url.into();
        let filename = filename_from_url(&url);
        let destination = directory.join(&filename);
        Self {
            id,
            url,
            filename,
            destination,
            status: Status::Waiting,
            progress: 0.0,
        }
    }

    /// Get the task's id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Get the source URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the display name, the last path segment of the URL.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Get the output file location.
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Get the current status.
    pub fn status(&self) -> Status {
        self.status
    }

    /// Get the completion percentage, in `[0, 100]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Move the task to `next`, rejecting anything that is not a forward step.
    pub fn transition(&mut self, next: Status) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    /// Record a new completion percentage.
    ///
    /// Only applies while `DOWNLOADING`. The value is clamped to `[0, 100]`
    /// and never lowers the current one. Returns whether it changed.
    pub fn set_progress(&mut self, percent: f64) -> bool {
        if self.status != Status::Downloading || percent.is_nan() {
            return false;
        }
        let percent = percent.clamp(0.0, 100.0);
        if percent <= self.progress {
            return false;
        }
        self.progress = percent;
        true
    }

    /// Force a terminal status after a failure the download itself could not
    /// record. Terminal tasks are left alone.
    pub(crate) fn force_failed(&mut self) {
        if !self.status.is_terminal() {
            self.status = Status::Failed;
        }
    }
}
