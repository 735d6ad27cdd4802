//! Error types for rxlite streams

use std::any::Any;
use std::fmt;

use thiserror::Error;

/// Operator whose user-supplied function failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Map,
    Filter,
    FlatMap,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operator::Map => write!(f, "map"),
            Operator::Filter => write!(f, "filter"),
            Operator::FlatMap => write!(f, "flat_map"),
        }
    }
}

/// Error delivered through `Observer::on_error`
///
/// Cloneable so a single failure can be handed to a scheduler task or
/// recorded by several observers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// Raised by an emission function calling `on_error` itself
    #[error("{0}")]
    Source(String),

    /// A `try_map` / `try_filter` / `try_flat_map` function returned `Err`
    #[error("{operator} function failed: {message}")]
    Operator { operator: Operator, message: String },

    /// A map / filter / flat_map function panicked
    #[error("{operator} function panicked: {message}")]
    Panicked { operator: Operator, message: String },
}

impl StreamError {
    /// Create a source error with the given message
    pub fn new(message: impl Into<String>) -> Self {
        StreamError::Source(message.into())
    }

    /// The bare failure message, without operator context
    pub fn message(&self) -> &str {
        match self {
            StreamError::Source(message) => message,
            StreamError::Operator { message, .. } => message,
            StreamError::Panicked { message, .. } => message,
        }
    }

    /// The operator that produced this error, if any
    pub fn operator(&self) -> Option<Operator> {
        match self {
            StreamError::Source(_) => None,
            StreamError::Operator { operator, .. } | StreamError::Panicked { operator, .. } => {
                Some(*operator)
            }
        }
    }
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
