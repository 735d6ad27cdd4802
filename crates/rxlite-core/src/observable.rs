//! Observable pipelines
//!
//! An [`Observable`] wraps exactly one emission function. Nothing runs until
//! [`Observable::subscribe`] is called, and every subscription re-runs the
//! emission function from scratch (cold semantics).
//!
//! Operators never mutate the receiver. Each call returns a new `Observable`
//! whose emission function subscribes to the upstream with a decorating
//! observer from [`crate::ops`].
//!
//! ```text
//!   create(emit) ──► map(f) ──► filter(p) ──► subscribe(sink)
//!
//!   subscribe(sink)
//!     └─ filter emission: upstream.subscribe(FilterObserver { sink })
//!          └─ map emission: upstream.subscribe(MapObserver { FilterObserver })
//!               └─ emit(MapObserver)  ── on_next ──► f ──► p ──► sink
//! ```

use std::convert::Infallible;
use std::fmt;
use std::sync::Arc;

use crate::error::StreamError;
use crate::observer::{Observer, SharedObserver};
use crate::ops;
use crate::scheduler::SharedScheduler;

/// Emission function: given an observer, push items and at most one terminal
///
/// Implemented for every `Fn(SharedObserver<T>) + Send + Sync` closure.
pub trait OnSubscribe<T>: Send + Sync {
    fn on_subscribe(&self, observer: SharedObserver<T>);
}

impl<T, F> OnSubscribe<T> for F
where
    F: Fn(SharedObserver<T>) + Send + Sync,
{
    #[inline]
    fn on_subscribe(&self, observer: SharedObserver<T>) {
        self(observer)
    }
}

/// A cold, push-based stream of `T`
///
/// Cloning is cheap and shares the emission function.
pub struct Observable<T> {
    source: Arc<dyn OnSubscribe<T>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
        }
    }
}

impl<T> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable").finish_non_exhaustive()
    }
}

impl<T: Send + 'static> Observable<T> {
    /// Wrap an emission closure without running it
    ///
    /// ```ignore
    /// let numbers = Observable::<i32>::create(|observer| {
    ///     observer.on_next(1);
    ///     observer.on_next(2);
    ///     observer.on_complete();
    /// });
    /// ```
    pub fn create<F>(emit: F) -> Self
    where
        F: Fn(SharedObserver<T>) + Send + Sync + 'static,
    {
        Self {
            source: Arc::new(emit),
        }
    }

    /// Wrap an [`OnSubscribe`] implementation without running it
    pub fn from_source<S>(source: S) -> Self
    where
        S: OnSubscribe<T> + 'static,
    {
        Self {
            source: Arc::new(source),
        }
    }

    /// Emit a fresh clone of `items` on every subscription, then complete
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
    {
        Self::create(move |observer: SharedObserver<T>| {
            for item in items.clone() {
                observer.on_next(item);
            }
            observer.on_complete();
        })
    }

    /// Complete immediately without emitting
    pub fn empty() -> Self {
        Self::create(|observer: SharedObserver<T>| observer.on_complete())
    }

    /// Fail immediately with `error`
    pub fn error(error: StreamError) -> Self {
        Self::create(move |observer: SharedObserver<T>| observer.on_error(error.clone()))
    }

    /// Run the emission function against `observer` on the calling thread
    pub fn subscribe<O>(&self, observer: O)
    where
        O: Observer<T> + 'static,
    {
        self.subscribe_shared(Arc::new(observer));
    }

    /// Like [`subscribe`](Self::subscribe) for an already shared observer
    pub fn subscribe_shared(&self, observer: SharedObserver<T>) {
        tracing::trace!(item = std::any::type_name::<T>(), "subscribe");
        self.source.on_subscribe(observer);
    }

    /// Transform every item with `transform`
    ///
    /// A panic inside `transform` is delivered downstream as
    /// [`StreamError::Panicked`]; afterwards this stage drops any further
    /// upstream events.
    pub fn map<R, F>(&self, transform: F) -> Observable<R>
    where
        R: Send + 'static,
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        self.try_map(move |item| Ok::<R, Infallible>(transform(item)))
    }

    /// Transform every item with a fallible `transform`
    ///
    /// The first `Err` (or panic) becomes a single [`StreamError::Operator`]
    /// (or [`StreamError::Panicked`]) delivered downstream, and this stage
    /// stops forwarding anything it receives afterwards.
    pub fn try_map<R, E, F>(&self, transform: F) -> Observable<R>
    where
        R: Send + 'static,
        E: fmt::Display + 'static,
        F: Fn(T) -> Result<R, E> + Send + Sync + 'static,
    {
        ops::map(self.clone(), transform)
    }

    /// Keep only the items for which `predicate` returns true
    pub fn filter<P>(&self, predicate: P) -> Observable<T>
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.try_filter(move |item: &T| Ok::<bool, Infallible>(predicate(item)))
    }

    /// Keep only the items for which a fallible `predicate` returns `Ok(true)`
    pub fn try_filter<E, P>(&self, predicate: P) -> Observable<T>
    where
        E: fmt::Display + 'static,
        P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
    {
        ops::filter(self.clone(), predicate)
    }

    /// Map every item to an inner observable and merge its items downstream
    ///
    /// Inner completions are dropped and the outer completion is forwarded as
    /// soon as the upstream completes, whether or not inner observables have
    /// finished. Synchronous inners run to completion before the next outer
    /// item is processed.
    pub fn flat_map<R, F>(&self, mapper: F) -> Observable<R>
    where
        R: Send + 'static,
        F: Fn(T) -> Observable<R> + Send + Sync + 'static,
    {
        self.try_flat_map(move |item| Ok::<Observable<R>, Infallible>(mapper(item)))
    }

    /// [`flat_map`](Self::flat_map) with a fallible `mapper`
    pub fn try_flat_map<R, E, F>(&self, mapper: F) -> Observable<R>
    where
        R: Send + 'static,
        E: fmt::Display + 'static,
        F: Fn(T) -> Result<Observable<R>, E> + Send + Sync + 'static,
    {
        ops::flat_map(self.clone(), mapper)
    }

    /// Run the whole upstream subscription as one task on `scheduler`
    ///
    /// `subscribe` on the returned observable only submits the task and
    /// returns; emission happens later on a scheduler thread.
    pub fn subscribe_on(&self, scheduler: SharedScheduler) -> Observable<T> {
        ops::subscribe_on(self.clone(), scheduler)
    }

    /// Deliver every event to the downstream observer from `scheduler`
    ///
    /// Each item, error or completion is submitted as its own task. Order
    /// between events is only preserved when the scheduler runs tasks FIFO
    /// on a single worker.
    pub fn observe_on(&self, scheduler: SharedScheduler) -> Observable<T> {
        ops::observe_on(self.clone(), scheduler)
    }
}
