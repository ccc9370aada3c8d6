//! Task data model.
//!
//! - [`task`] - the [`Task`] record and its [`TaskId`] handle
//! - [`status`] - the closed [`Status`] set and its forward-only transitions

pub mod status;
pub mod task;

pub use status::Status;
pub use task::{Task, TaskId};
