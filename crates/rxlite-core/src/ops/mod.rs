//! Operator implementations
//!
//! Every operator builds a new [`Observable`](crate::Observable) whose emission
//! function subscribes upstream with one of the named decorating observers
//! below. Decorators own a handle to the downstream observer plus whatever
//! per-operator state they need.
//!
//! # Decorators
//! - `MapObserver` - applies a transform
//! - `FilterObserver` - applies a predicate
//! - `FlatMapObserver` / `FlatMapInnerObserver` - subscribes to inner observables
//! - `ObserveOnObserver` - re-submits every event to a scheduler
//!
//! `subscribe_on` needs no decorator: it moves the whole upstream subscribe
//! call onto the scheduler.

mod filter;
mod flat_map;
mod map;
mod observe_on;
mod subscribe_on;

pub use filter::FilterObserver;
pub use flat_map::{FlatMapInnerObserver, FlatMapObserver};
pub use map::MapObserver;
pub use observe_on::ObserveOnObserver;

pub(crate) use filter::filter;
pub(crate) use flat_map::flat_map;
pub(crate) use map::map;
pub(crate) use observe_on::observe_on;
pub(crate) use subscribe_on::subscribe_on;

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{panic_message, Operator, StreamError};
use crate::observer::Observer;

/// Run a user-supplied operator function, turning `Err` and panics into
/// a [`StreamError`] tagged with `operator`
pub(crate) fn invoke<R, E, F>(operator: Operator, f: F) -> Result<R, StreamError>
where
    E: fmt::Display,
    F: FnOnce() -> Result<R, E>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(StreamError::Operator {
            operator,
            message: e.to_string(),
        }),
        Err(payload) => Err(StreamError::Panicked {
            operator,
            message: panic_message(&*payload),
        }),
    }
}

/// Per-subscription latch closed by the decorator's own failure
///
/// Once closed, the decorator forwards nothing else. Upstream terminals do
/// not close it.
#[derive(Debug, Default)]
pub(crate) struct Gate {
    closed: AtomicBool,
}

impl Gate {
    #[inline]
    pub(crate) fn is_open(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    /// Close the gate and deliver `error`, unless it was already closed
    pub(crate) fn fail<T>(&self, downstream: &dyn Observer<T>, error: StreamError) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!(%error, "operator function failed, closing stage");
        downstream.on_error(error);
    }
}
