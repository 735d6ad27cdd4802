//! `map` / `try_map`

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{invoke, Gate};
use crate::error::{Operator, StreamError};
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};

pub(crate) fn map<T, R, E, F>(upstream: Observable<T>, transform: F) -> Observable<R>
where
    T: Send + 'static,
    R: Send + 'static,
    E: fmt::Display + 'static,
    F: Fn(T) -> Result<R, E> + Send + Sync + 'static,
{
    let transform = Arc::new(transform);
    Observable::create(move |downstream: SharedObserver<R>| {
        let decorator = MapObserver::new(downstream, Arc::clone(&transform));
        upstream.subscribe_shared(Arc::new(decorator));
    })
}

/// Decorator applying a transform to each item
pub struct MapObserver<T, R, E, F> {
    downstream: SharedObserver<R>,
    transform: Arc<F>,
    gate: Gate,
    _marker: PhantomData<fn(T) -> E>,
}

impl<T, R, E, F> MapObserver<T, R, E, F> {
    pub fn new(downstream: SharedObserver<R>, transform: Arc<F>) -> Self {
        Self {
            downstream,
            transform,
            gate: Gate::default(),
            _marker: PhantomData,
        }
    }
}

impl<T, R, E, F> Observer<T> for MapObserver<T, R, E, F>
where
    E: fmt::Display,
    F: Fn(T) -> Result<R, E> + Send + Sync,
{
    fn on_next(&self, item: T) {
        if !self.gate.is_open() {
            return;
        }
        match invoke(Operator::Map, || (*self.transform)(item)) {
            Ok(value) => self.downstream.on_next(value),
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
