//! `subscribe_on`

use std::sync::Arc;

use crate::observable::Observable;
use crate::observer::SharedObserver;
use crate::scheduler::SharedScheduler;

pub(crate) fn subscribe_on<T>(upstream: Observable<T>, scheduler: SharedScheduler) -> Observable<T>
where
    T: Send + 'static,
{
    Observable::create(move |downstream: SharedObserver<T>| {
        let upstream = upstream.clone();
        scheduler.execute(Box::new(move || upstream.subscribe_shared(downstream)));
    })
}
