//! Task status and its legal transitions.
//!
//! A task only ever moves forward:
//!
//! ```text
//! WAITING -> DOWNLOADING -> DONE | FAILED | CANCELLED
//! ```
//!
//! ```rust
//! use fetchpool::task::Status;
//!
//! assert!(Status::Waiting.can_transition_to(Status::Downloading));
//! assert!(!Status::Done.can_transition_to(Status::Downloading));
//! assert!(Status::Failed.is_terminal());
//! ```

use std::fmt;

/// Lifecycle state of a [`Task`](super::Task).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Submitted and sitting in the queue.
    Waiting,
    /// Held by a worker and streaming.
    Downloading,
    /// Fully transferred.
    Done,
    /// Aborted by a connection, transfer or local I/O error.
    Failed,
    /// Aborted by a cancellation request.
    Cancelled,
}

impl Status {
    /// Returns `true` for `DONE`, `FAILED` and `CANCELLED`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Status::Done | Status::Failed | Status::Cancelled)
    }

    /// Whether a task in this state may move to `next`.
    pub fn can_transition_to(self, next: Status) -> bool {
        matches!(
            (self, next),
            (Status::Waiting, Status::Downloading)
                | (Status::Downloading, Status::Done)
                | (Status::Downloading, Status::Failed)
                | (Status::Downloading, Status::Cancelled)
        )
    }

    /// Upper-case label used for display.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Waiting => "WAITING",
            Status::Downloading => "DOWNLOADING",
            Status::Done => "DONE",
            Status::Failed => "FAILED",
            Status::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Status; 5] = [
        Status::Waiting,
        Status::Downloading,
        Status::Done,
        Status::Failed,
        Status::Cancelled,
    ];

    #[test]
    fn test_forward_transitions() {
        assert!(Status::Waiting.can_transition_to(Status::Downloading));
        assert!(Status::Downloading.can_transition_to(Status::Done));
        assert!(Status::Downloading.can_transition_to(Status::Failed));
        assert!(Status::Downloading.can_transition_to(Status::Cancelled));
    }

    #[test]
    fn test_waiting_cannot_skip_downloading() {
        assert!(!Status::Waiting.can_transition_to(Status::Done));
        assert!(!Status::Waiting.can_transition_to(Status::Failed));
        assert!(!Status::Waiting.can_transition_to(Status::Cancelled));
    }

    #[test]
    fn test_terminal_states_are_final() {
        for from in ALL.iter().copied().filter(|s| s.is_terminal()) {
            for to in ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
            }
        }
    }

    #[test]
    fn test_no_self_transitions() {
        for s in ALL {
            assert!(!s.can_transition_to(s));
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Status::Waiting.to_string(), "WAITING");
        assert_eq!(Status::Cancelled.to_string(), "CANCELLED");
    }
}
