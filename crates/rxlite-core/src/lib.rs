//! # rxlite-core
//!
//! Core types and traits for rxlite, a minimal push-based reactive stream library.
//!
//! This crate is platform-agnostic and spawns no threads of its own.
//! Thread-backed schedulers live in `rxlite-runtime`.
//!
//! ## Modules
//!
//! - `observer` - Observer (sink) trait, closure observers, notifications
//! - `observable` - Observable pipeline, emission functions, operator methods
//! - `ops` - Named decorating observers, one per operator
//! - `scheduler` - Scheduler trait and task type
//! - `error` - Stream error type
//! - `test_observer` - Recording observer for tests and diagnostics
//! - `env` - Environment variable utilities

pub mod env;
pub mod error;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod scheduler;
pub mod test_observer;

// Re-exports for convenience
pub use env::{env_get, env_get_str};
pub use error::{panic_message, Operator, StreamError};
pub use observable::{Observable, OnSubscribe};
pub use observer::{observer_fn, FnObserver, Notification, Observer, SharedObserver};
pub use scheduler::{Scheduler, SharedScheduler, Task};
pub use test_observer::{Recorded, TestObserver};
