//! Observer (sink) contract
//!
//! An observer receives zero or more items followed by at most one terminal
//! notification. The "at most one terminal" part of the protocol is expected
//! of emitters but is not enforced anywhere in the framework: an observer that
//! must never see events after a terminal has to guard itself.

use std::fmt;
use std::sync::Arc;

use crate::error::StreamError;

/// Receiving side of a stream
///
/// Observers are `Send + Sync` because a scheduler may deliver to them from
/// any of its worker threads, and `observe_on` can deliver from several
/// workers at once.
pub trait Observer<T>: Send + Sync {
    /// Receive the next item
    fn on_next(&self, item: T);

    /// Receive a terminal error
    fn on_error(&self, error: StreamError);

    /// Receive the terminal completion signal
    fn on_complete(&self);
}

/// Shared, type-erased observer handle passed to emission functions
pub type SharedObserver<T> = Arc<dyn Observer<T>>;

impl<T, O> Observer<T> for Arc<O>
where
    O: Observer<T> + ?Sized,
{
    #[inline]
    fn on_next(&self, item: T) {
        (**self).on_next(item)
    }

    #[inline]
    fn on_error(&self, error: StreamError) {
        (**self).on_error(error)
    }

    #[inline]
    fn on_complete(&self) {
        (**self).on_complete()
    }
}

/// A single stream event
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<T> {
    Next(T),
    Error(StreamError),
    Complete,
}

impl<T> Notification<T> {
    /// Whether this is an error or completion
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Notification::Next(_))
    }

    /// Hand this event to the matching observer method
    pub fn deliver(self, observer: &dyn Observer<T>) {
        match self {
            Notification::Next(item) => observer.on_next(item),
            Notification::Error(error) => observer.on_error(error),
            Notification::Complete => observer.on_complete(),
        }
    }
}

/// Observer assembled from three closures
pub struct FnObserver<N, E, C> {
    next: N,
    error: E,
    complete: C,
}

impl<N, E, C> FnObserver<N, E, C> {
    pub fn new(next: N, error: E, complete: C) -> Self {
        Self {
            next,
            error,
            complete,
        }
    }
}

impl<T, N, E, C> Observer<T> for FnObserver<N, E, C>
where
    N: Fn(T) + Send + Sync,
    E: Fn(StreamError) + Send + Sync,
    C: Fn() + Send + Sync,
{
    fn on_next(&self, item: T) {
        (self.next)(item)
    }

    fn on_error(&self, error: StreamError) {
        (self.error)(error)
    }

    fn on_complete(&self) {
        (self.complete)()
    }
}

impl<N, E, C> fmt::Debug for FnObserver<N, E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnObserver").finish_non_exhaustive()
    }
}

/// Build an observer from `on_next`, `on_error` and `on_complete` closures
///
/// ```ignore
/// use rxlite_core::{observer_fn, Observable};
///
/// Observable::from_iter(vec![1, 2, 3]).subscribe(observer_fn(
///     |item: i32| println!("next {}", item),
///     |error| eprintln!("error {}", error),
///     || println!("done"),
/// ));
/// ```
pub fn observer_fn<T, N, E, C>(next: N, error: E, complete: C) -> FnObserver<N, E, C>
where
    N: Fn(T) + Send + Sync,
    E: Fn(StreamError) + Send + Sync,
    C: Fn() + Send + Sync,
{
    FnObserver::new(next, error, complete)
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_fn_observer_routes_each_method() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let observer = observer_fn(
            move |item: i32| l1.lock().push(format!("next {}", item)),
            move |error: StreamError| l2.lock().push(format!("error {}", error)),
            move || l3.lock().push("complete".to_string()),
        );

        observer.on_next(1);
        observer.on_error(StreamError::new("bad"));
        observer.on_complete();

        assert_eq!(*log.lock(), vec!["next 1", "error bad", "complete"]);
    }

    #[test]
    fn test_notification_deliver() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let (l1, l2, l3) = (log.clone(), log.clone(), log.clone());
        let observer = observer_fn(
            move |item: &'static str| l1.lock().push(item.to_string()),
            move |error: StreamError| l2.lock().push(error.message().to_string()),
            move || l3.lock().push("done".to_string()),
        );

        Notification::Next("a").deliver(&observer);
        Notification::Error(StreamError::new("e")).deliver(&observer);
        Notification::<&'static str>::Complete.deliver(&observer);

        assert_eq!(*log.lock(), vec!["a", "e", "done"]);
    }

    #[test]
    fn test_notification_is_terminal() {
        assert!(!Notification::Next(1).is_terminal());
        assert!(Notification::<i32>::Error(StreamError::new("x")).is_terminal());
        assert!(Notification::<i32>::Complete.is_terminal());
    }

    #[test]
    fn test_arc_observer_forwards() {
        let count = Arc::new(Mutex::new(0));
        let c = count.clone();
        let shared: SharedObserver<i32> =
            Arc::new(observer_fn(move |item: i32| *c.lock() += item, |_| {}, || {}));
        let wrapped = Arc::new(shared);
        wrapped.on_next(2);
        wrapped.on_next(3);
        assert_eq!(*count.lock(), 5);
    }
}
