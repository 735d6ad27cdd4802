//! `filter` / `try_filter`

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use super::{invoke, Gate};
use crate::error::{Operator, StreamError};
use crate::observable::Observable;
use crate::observer::{Observer, SharedObserver};

pub(crate) fn filter<T, E, P>(upstream: Observable<T>, predicate: P) -> Observable<T>
where
    T: Send + 'static,
    E: fmt::Display + 'static,
    P: Fn(&T) -> Result<bool, E> + Send + Sync + 'static,
{
    let predicate = Arc::new(predicate);
    Observable::create(move |downstream: SharedObserver<T>| {
        let decorator = FilterObserver::new(downstream, Arc::clone(&predicate));
        upstream.subscribe_shared(Arc::new(decorator));
    })
}

/// Decorator forwarding only the items its predicate accepts
pub struct FilterObserver<T, E, P> {
    downstream: SharedObserver<T>,
    predicate: Arc<P>,
    gate: Gate,
    _marker: PhantomData<fn() -> E>,
}

impl<T, E, P> FilterObserver<T, E, P> {
    pub fn new(downstream: SharedObserver<T>, predicate: Arc<P>) -> Self {
        Self {
            downstream,
            predicate,
            gate: Gate::default(),
            _marker: PhantomData,
        }
    }
}

impl<T, E, P> Observer<T> for FilterObserver<T, E, P>
where
    E: fmt::Display,
    P: Fn(&T) -> Result<bool, E> + Send + Sync,
{
    fn on_next(&self, item: T) {
        if !self.gate.is_open() {
            return;
        }
        match invoke(Operator::Filter, || (*self.predicate)(&item)) {
            Ok(true) => self.downstream.on_next(item),
            Ok(false) => {}
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

#[cfg(test)]
mod tests {
    use crate::error::{Operator, StreamError};
    use crate::observable::Observable;
    use crate::observer::Notification;
    use crate::test_observer::TestObserver;
    use std::sync::Arc;

    #[test]
    fn test_filter_evens() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![1, 2, 3, 4, 5])
            .filter(|x| x % 2 == 0)
            .subscribe(observer.clone());

        assert_eq!(observer.values(), vec![2, 4]);
        assert_eq!(observer.completions(), 1);
        assert!(observer.errors().is_empty());
    }

    #[test]
    fn test_filter_preserves_order() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![9, 3, 8, 1, 7, 2])
            .filter(|x| *x > 2)
            .subscribe(observer.clone());

        assert_eq!(observer.values(), vec![9, 3, 8, 7]);
    }

    #[test]
    fn test_filter_rejects_everything() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![1, 3, 5])
            .filter(|x| x % 2 == 0)
            .subscribe(observer.clone());

        assert_eq!(observer.notifications(), vec![Notification::Complete]);
    }

    #[test]
    fn test_try_filter_error() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![2, -1, 4])
            .try_filter(|x: &i32| {
                if *x < 0 {
                    Err("negative input")
                } else {
                    Ok(true)
                }
            })
            .subscribe(observer.clone());

        assert_eq!(
            observer.notifications(),
            vec![
                Notification::Next(2),
                Notification::Error(StreamError::Operator {
                    operator: Operator::Filter,
                    message: "negative input".to_string(),
                }),
            ]
        );
    }

    #[test]
    fn test_filter_panic_becomes_error() {
        let observer = Arc::new(TestObserver::new());

        Observable::from_iter(vec![1, 0, 2])
            .filter(|x: &i32| 10 / *x > 1)
            .subscribe(observer.clone());

        assert_eq!(observer.values(), vec![1]);
        let errors = observer.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].operator(), Some(Operator::Filter));
        assert!(matches!(errors[0], StreamError::Panicked { .. }));
        assert_eq!(observer.completions(), 0);
    }
}
