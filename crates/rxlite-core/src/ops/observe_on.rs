//! `observe_on`

use std::sync::Arc;

use crate::error::StreamError;
use crate::observable::Observable;
use crate::observer::{Notification, Observer, SharedObserver};
use crate::scheduler::SharedScheduler;

pub(crate) fn observe_on<T>(upstream: Observable<T>, scheduler: SharedScheduler) -> Observable<T>
where
    T: Send + 'static,
{
    Observable::create(move |downstream: SharedObserver<T>| {
        let decorator = ObserveOnObserver::new(downstream, Arc::clone(&scheduler));
        upstream.subscribe_shared(Arc::new(decorator));
    })
}

/// Decorator submitting every event to a scheduler as its own task
pub struct ObserveOnObserver<T> {
    downstream: SharedObserver<T>,
    scheduler: SharedScheduler,
}

impl<T: Send + 'static> ObserveOnObserver<T> {
    pub fn new(downstream: SharedObserver<T>, scheduler: SharedScheduler) -> Self {
        Self {
            downstream,
            scheduler,
        }
    }

    fn schedule(&self, notification: Notification<T>) {
        let downstream = Arc::clone(&self.downstream);
        self.scheduler
            .execute(Box::new(move || notification.deliver(&*downstream)));
    }
}

impl<T: Send + 'static> Observer<T> for ObserveOnObserver<T> {
    fn on_next(&self, item: T) {
        self.schedule(Notification::Next(item));
    }

    fn on_error(&self, error: StreamError) {
        self.schedule(Notification::Error(error));
    }

    fn on_complete(&self) {
        self.schedule(Notification::Complete);
    }
}
