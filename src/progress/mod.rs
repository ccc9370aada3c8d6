//! Progress reporting, from worker tasks to the screen.
//!
//! - `reporter` - the [`Reporter`] boundary workers call, and the single
//!   consumer [`channel`] that carries events to the presentation layer
//! - `display` - [`TaskBoard`], a terminal consumer drawing one bar per task
//! - `style` - progress bar styling options
//!
//! # Examples
//!
//! ```rust
//! use fetchpool::progress::{channel, ProgressEvent, Reporter, StyleOptions, TaskBoard};
//! use fetchpool::task::{Status, TaskId};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (reporter, feed) = channel();
//! reporter.report(ProgressEvent::new(TaskId(1), Status::Downloading, 12.5));
//! drop(reporter);
//!
//! let mut board = TaskBoard::new(StyleOptions::hidden());
//! board.drain(feed).await;
//! assert_eq!(board.progress(TaskId(1)), Some(12.5));
//! # }
//! ```

pub(crate) mod display;
pub(crate) mod reporter;
pub(crate) mod style;

pub use display::{format_percent, TaskBoard};
pub use reporter::{channel, ChannelReporter, NoopReporter, ProgressEvent, ProgressFeed, Reporter};
pub use style::{ProgressBarOpts, StyleOptions};
