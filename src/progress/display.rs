//! Terminal task board, the presentation-side consumer of progress events.
//!
//! [`TaskBoard`] owns every piece of display state. It is meant to live on a
//! single task that drains a [`ProgressFeed`], so no lock guards it: workers
//! only ever touch the channel.
//!
//! ```rust,no_run
//! use fetchpool::progress::{channel, StyleOptions, TaskBoard};
//! use fetchpool::RunnerBuilder;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), fetchpool::Error> {
//! let (reporter, feed) = channel();
//! let runner = RunnerBuilder::new().build(reporter)?;
//!
//! let mut board = TaskBoard::new(StyleOptions::default());
//! board.add(&runner.submit("https://example.com/file.zip"));
//!
//! runner.shutdown().await;
//! board.drain(feed).await;
//! # Ok(())
//! # }
//! ```

use super::reporter::{ProgressEvent, ProgressFeed};
use super::style::{ProgressBarOpts, StyleOptions};
use crate::task::{Status, Task, TaskId};

use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget};
use std::collections::BTreeMap;

/// Render a percentage with two decimals and a percent sign.
///
/// ```rust
/// use fetchpool::progress::format_percent;
///
/// assert_eq!(format_percent(51.2), "51.20%");
/// assert_eq!(format_percent(100.0), "100.00%");
/// ```
pub fn format_percent(percent: f64) -> String {
    format!("{:.2}%", percent)
}

/// Displayed state of one task.
#[derive(Debug)]
struct Row {
    filename: String,
    status: Status,
    progress: f64,
    bar: ProgressBar,
}

impl Row {
    fn message(&self) -> String {
        format!(
            "{}  {}  {}",
            self.filename,
            self.status,
            format_percent(self.progress)
        )
    }
}

/// One bar per task, keyed by task id, plus a main bar counting finished tasks.
pub struct TaskBoard {
    multi: MultiProgress,
    main: ProgressBar,
    style_options: StyleOptions,
    rows: BTreeMap<TaskId, Row>,
    finished: u64,
}

impl std::fmt::Debug for TaskBoard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskBoard")
            .field("style_options", &self.style_options)
            .field("rows", &self.rows.len())
            .field("finished", &self.finished)
            .finish()
    }
}

impl TaskBoard {
    /// Create an empty board.
    pub fn new(style_options: StyleOptions) -> Self {
        let multi = match style_options.is_enabled() {
            true => MultiProgress::new(),
            false => MultiProgress::with_draw_target(ProgressDrawTarget::hidden()),
        };
        let main = multi.add(style_options.main().clone().to_progress_bar(0));
        Self {
            multi,
            main,
            style_options,
            rows: BTreeMap::new(),
            finished: 0,
        }
    }

    /// Add a row for a freshly submitted task.
    ///
    /// Adding a task twice keeps the existing row.
    pub fn add(&mut self, task: &Task) {
        if self.rows.contains_key(&task.id()) {
            return;
        }
        self.insert_row(task.id(), task.filename().to_string(), task.status());
        if let Some(row) = self.rows.get_mut(&task.id()) {
            row.progress = task.progress();
            row.bar.set_message(row.message());
        }
    }

    fn insert_row(&mut self, id: TaskId, filename: String, status: Status) {
        let bar = self.multi.insert_before(
            &self.main,
            self.style_options
                .child()
                .clone()
                .to_progress_bar(ProgressBarOpts::ROW_LENGTH),
        );
        bar.set_prefix(id.0.to_string());
        let row = Row {
            filename,
            status,
            progress: 0.0,
            bar,
        };
        row.bar.set_message(row.message());
        self.rows.insert(id, row);
        self.main.inc_length(1);
    }

    /// Apply one progress event to the row it targets.
    ///
    /// Events for tasks never added get a row named after their id. Events
    /// for an already terminal row are ignored, which makes the duplicate
    /// terminal reports from the pool harmless.
    pub fn apply(&mut self, event: &ProgressEvent) {
        if !self.rows.contains_key(&event.task_id) {
            self.insert_row(event.task_id, event.task_id.to_string(), Status::Waiting);
        }
        let Some(row) = self.rows.get_mut(&event.task_id) else {
            return;
        };
        if row.status.is_terminal() {
            return;
        }

        row.status = event.status;
        row.progress = event.progress.clamp(0.0, 100.0);
        row.bar.set_position((row.progress * 100.0).round() as u64);
        row.bar.set_message(row.message());

        if row.status.is_terminal() {
            if self.style_options.child().clear {
                row.bar.finish_and_clear();
            } else {
                row.bar.finish();
            }
            self.finished += 1;
            self.main.inc(1);
        }
    }

    /// Consume a feed until every reporter is gone.
    pub async fn drain(&mut self, mut feed: ProgressFeed) {
        while let Some(event) = feed.recv().await {
            self.apply(&event);
        }
        self.finish();
    }

    /// Displayed status of a task.
    pub fn status(&self, id: TaskId) -> Option<Status> {
        self.rows.get(&id).map(|row| row.status)
    }

    /// Displayed percentage of a task.
    pub fn progress(&self, id: TaskId) -> Option<f64> {
        self.rows.get(&id).map(|row| row.progress)
    }

    /// Number of rows on the board.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` when the board has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `true` once every row has reached a terminal status.
    pub fn all_finished(&self) -> bool {
        self.finished as usize == self.rows.len()
    }

    /// Finish the main bar, clearing or keeping it based on configuration.
    pub fn finish(&self) {
        if self.style_options.main().clear {
            self.main.finish_and_clear();
        } else {
            self.main.finish();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::channel;
    use crate::progress::Reporter;
    use std::path::Path;

    fn board() -> TaskBoard {
        TaskBoard::new(StyleOptions::hidden())
    }

    fn task(id: u64) -> Task {
        Task::new(
            TaskId(id),
            format!("http://example.com/file{}.bin", id),
            Path::new("/tmp"),
        )
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.0), "0.00%");
        assert_eq!(format_percent(33.333333), "33.33%");
        assert_eq!(format_percent(99.999), "100.00%");
    }

    #[test]
    fn test_add_then_apply() {
        let mut board = board();
        board.add(&task(1));
        assert_eq!(board.status(TaskId(1)), Some(Status::Waiting));

        board.apply(&ProgressEvent::new(TaskId(1), Status::Downloading, 42.5));
        assert_eq!(board.status(TaskId(1)), Some(Status::Downloading));
        assert_eq!(board.progress(TaskId(1)), Some(42.5));
        assert!(!board.all_finished());
    }

    #[test]
    fn test_terminal_row_ignores_late_events() {
        let mut board = board();
        board.add(&task(1));
        board.apply(&ProgressEvent::new(TaskId(1), Status::Downloading, 0.0));
        board.apply(&ProgressEvent::new(TaskId(1), Status::Done, 100.0));
        board.apply(&ProgressEvent::new(TaskId(1), Status::Done, 100.0));
        board.apply(&ProgressEvent::new(TaskId(1), Status::Failed, 3.0));

        assert_eq!(board.status(TaskId(1)), Some(Status::Done));
        assert_eq!(board.progress(TaskId(1)), Some(100.0));
        assert!(board.all_finished());
    }

    #[test]
    fn test_unknown_task_gets_a_row() {
        let mut board = board();
        board.apply(&ProgressEvent::new(TaskId(8), Status::Downloading, 5.0));
        assert_eq!(board.len(), 1);
        assert_eq!(board.status(TaskId(8)), Some(Status::Downloading));
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut board = board();
        board.add(&task(1));
        board.add(&task(1));
        assert_eq!(board.len(), 1);
    }

    #[tokio::test]
    async fn test_drain_consumes_feed() {
        let (reporter, feed) = channel();
        let mut board = board();
        board.add(&task(1));
        board.add(&task(2));

        reporter.report(ProgressEvent::new(TaskId(1), Status::Downloading, 0.0));
        reporter.report(ProgressEvent::new(TaskId(2), Status::Downloading, 0.0));
        reporter.report(ProgressEvent::new(TaskId(1), Status::Failed, 0.0));
        reporter.report(ProgressEvent::new(TaskId(2), Status::Done, 100.0));
        drop(reporter);

        board.drain(feed).await;
        assert_eq!(board.status(TaskId(1)), Some(Status::Failed));
        assert_eq!(board.status(TaskId(2)), Some(Status::Done));
        assert!(board.all_finished());
    }
}
