//! Error handling for the fetchpool library.
//!
//! Every failure a download can hit is represented here. The worker pool never
//! lets one of these escape a single task: they are collapsed into a terminal
//! [`Status`](crate::Status) and logged, so a presentation layer only ever sees
//! `FAILED` or `CANCELLED`.

use crate::task::Status;

use std::io;
use thiserror::Error;

/// Errors that can happen when using fetchpool.
#[derive(Error, Debug)]
pub enum Error {
    /// Error from an underlying system.
    #[error("Internal error: {0}")]
    Internal(String),

    /// The runner was configured with a value it cannot work with.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A task was asked to move backward, skip a state or leave a terminal state.
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition { from: Status, to: Status },

    /// The remote endpoint could not be reached or refused the request.
    #[error("Connection to \"{url}\" failed")]
    Connection {
        url: String,
        #[source]
        source: reqwest_middleware::Error,
    },

    /// The remote endpoint answered with a non-success status code.
    #[error("\"{url}\" answered with HTTP {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },

    /// The connection was interrupted mid-stream.
    #[error("Transfer interrupted")]
    Transfer {
        #[source]
        source: io::Error,
    },

    /// I/O Error.
    ///
    /// Raised when the destination file cannot be created or written.
    #[error("I/O error")]
    IOError {
        #[from]
        source: io::Error,
    },

    /// Error from the Reqwest library.
    #[error("Reqwest Error")]
    Reqwest {
        #[from]
        source: reqwest::Error,
    },

    /// The task or the whole pool was cancelled.
    #[error("Cancelled")]
    Cancelled,
}

/// Result type alias for operations that can fail with a fetchpool error.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// The terminal status a task ends in when its download hits this error.
    pub fn terminal_status(&self) -> Status {
        match self {
            Error::Cancelled => Status::Cancelled,
            _ => Status::Failed,
        }
    }
}
