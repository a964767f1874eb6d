//! Error types shared by the dispatcher and its collaborators

use thiserror::Error;

/// Errors surfaced by host capabilities, storage and the background worker.
///
/// None of these are fatal to the dispatcher: every caller degrades to
/// "log and keep handling keys".
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded or decoded as JSON
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A host command was found but failed while running
    #[error("command {id} failed: {reason}")]
    CommandFailed {
        /// Host command identifier
        id: String,
        /// Host-provided failure description
        reason: String,
    },

    /// An optional host capability is not provided by this host
    #[error("host capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),

    /// The background worker has shut down and no longer accepts jobs
    #[error("background worker has stopped")]
    WorkerStopped,
}

/// Result alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
