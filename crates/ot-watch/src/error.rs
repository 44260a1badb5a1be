//! Watch and action error types.

use thiserror::Error;

/// Why a watch run (or a group of runs) did not complete.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Fetching a page from the change log failed. Never retried.
    #[error("change log fetch failed: {0}")]
    Transport(#[from] ot_api::ApiError),

    /// The run observed cancellation, usually because a sibling failed.
    #[error("watch cancelled")]
    Cancelled,

    /// The configuration can never make progress.
    #[error("invalid watch configuration: {0}")]
    Configuration(String),

    /// A spawned run panicked or was aborted.
    #[error("watch task failed: {0}")]
    Task(String),
}

impl WatchError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Failure to deliver one change to its action.
#[derive(Debug, Error)]
pub enum ActionError {
    /// The change could not be serialized.
    #[error("failed to serialize change: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The record could not be written to stdout.
    #[error("failed to write change to stdout: {0}")]
    Output(#[source] std::io::Error),

    /// The command could not be started.
    #[error("failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Writing the record or waiting for the command failed.
    #[error("I/O error talking to '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The command ran but exited unsuccessfully.
    #[error("'{program}' exited with {status}")]
    Failed {
        program: String,
        status: std::process::ExitStatus,
    },
}
