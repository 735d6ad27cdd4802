//! Error types for the scheduler runtime

use std::io;

use thiserror::Error;

/// Errors raised while building or feeding a scheduler
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid scheduler configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("failed to spawn worker thread {name}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },

    /// The pool no longer accepts tasks
    #[error("pool {0} is shut down")]
    Shutdown(String),
}

/// Result type for runtime operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
