//! `flat_map` / `try_flat_map`
//!
//! Inner observables are subscribed as soon as their outer item arrives.
//! There is no join: inner completions are swallowed and the outer
//! completion goes downstream as soon as upstream completes, even if an
//! inner observable running on another scheduler is still emitting.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{invoke, Gate};
use crate::error::{Operator, StreamError};
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};

pub(crate) fn flat_map<T, R, E, F>(upstream: Observable<T>, mapper: F) -> Observable<R>
where
    T: Send + 'static,
    R: Send + 'static,
    E: fmt::Display + 'static,
    F: Fn(T) -> Result<Observable<R>, E> + Send + Sync + 'static,
{
    let mapper = Arc::new(mapper);
    Observable::create(move |downstream: SharedObserver<R>| {
        let decorator = FlatMapObserver::new(downstream, Arc::clone(&mapper));
        upstream.subscribe_shared(Arc::new(decorator));
    })
}

/// Outer decorator: maps each item to an inner observable and subscribes it
pub struct FlatMapObserver<T, R, E, F> {
    downstream: SharedObserver<R>,
    mapper: Arc<F>,
    gate: Gate,
    _marker: PhantomData<fn(T) -> E>,
}

impl<T, R, E, F> FlatMapObserver<T, R, E, F> {
    pub fn new(downstream: SharedObserver<R>, mapper: Arc<F>) -> Self {
        Self {
            downstream,
            mapper,
            gate: Gate::default(),
            _marker: PhantomData,
        }
    }
}

impl<T, R, E, F> Observer<T> for FlatMapObserver<T, R, E, F>
where
    R: Send + 'static,
    E: fmt::Display,
    F: Fn(T) -> Result<Observable<R>, E> + Send + Sync,
{
    fn on_next(&self, item: T) {
        if !self.gate.is_open() {
            return;
        }
        match invoke(Operator::FlatMap, || (*self.mapper)(item)) {
            Ok(inner) => {
                let inner_observer = FlatMapInnerObserver::new(Arc::clone(&self.downstream));
                inner.subscribe_shared(Arc::new(inner_observer));
            }
            Err(error) => self.gate.fail(&*self.downstream, error),
        }
    }

    fn on_error(&self, error: StreamError) {
        if self.gate.is_open() {
            self.downstream.on_error(error);
        }
    }

    fn on_complete(&self) {
        if self.gate.is_open() {
            self.downstream.on_complete();
        }
    }
}

/// Inner decorator: forwards items and errors, drops completion
pub struct FlatMapInnerObserver<R> {
    downstream: SharedObserver<R>,
}

impl<R> FlatMapInnerObserver<R> {
    pub fn new(downstream: SharedObserver<R>) -> Self {
        Self { downstream }
    }
}

impl<R> Observer<R> for FlatMapInnerObserver<R> {
    #[inline]
    fn on_next(&self, item: R) {
        self.downstream.on_next(item);
    }

    fn on_error(&self, error: StreamError) {
        self.downstream.on_error(error);
    }

    fn on_complete(&self) {
        tracing::trace!("inner observable completed, not forwarded");
    }
}
