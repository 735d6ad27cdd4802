//! Recording observer
//!
//! [`TestObserver`] stores every event it receives together with the thread
//! that delivered it. Callers on another thread can block until a terminal
//! (or a number of events) arrives, which is how the scheduler-based
//! pipelines are checked without sleeping.

use parking_lot::{Condvar, Mutex};
use std::thread::{self, ThreadId};
use std::time::{Duration, Instant};

use crate::error::StreamError;
use crate::observer::{Notification, Observer};

/// One received event and where it was delivered
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded<T> {
    pub notification: Notification<T>,
    pub thread_id: ThreadId,
    pub thread_name: Option<String>,
}

/// Observer that records everything it is given
///
/// Terminals are recorded like any other event: if an emitter misbehaves
/// and keeps going after a terminal, that is visible in the log.
pub struct TestObserver<T> {
    events: Mutex<Vec<Recorded<T>>>,
    changed: Condvar,
}

impl<T> TestObserver<T> {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            changed: Condvar::new(),
        }
    }

    fn record(&self, notification: Notification<T>) {
        let current = thread::current();
        let recorded = Recorded {
            notification,
            thread_id: current.id(),
            thread_name: current.name().map(str::to_owned),
        };
        self.events.lock().push(recorded);
        self.changed.notify_all();
    }

    /// Number of events (items and terminals) received so far
    pub fn event_count(&self) -> usize {
        self.events.lock().len()
    }

    /// Number of `on_complete` calls received
    pub fn completions(&self) -> usize {
        self.events
            .lock()
            .iter()
            .filter(|r| matches!(r.notification, Notification::Complete))
            .count()
    }

    /// All errors received, in order
    pub fn errors(&self) -> Vec<StreamError> {
        self.events
            .lock()
            .iter()
            .filter_map(|r| match &r.notification {
                Notification::Error(e) => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether an error or completion has been received
    pub fn is_terminated(&self) -> bool {
        self.events
            .lock()
            .iter()
            .any(|r| r.notification.is_terminal())
    }

    /// Names of the delivering threads, one entry per event
    pub fn thread_names(&self) -> Vec<Option<String>> {
        self.events
            .lock()
            .iter()
            .map(|r| r.thread_name.clone())
            .collect()
    }

    /// Block until a terminal arrives or `timeout` elapses
    ///
    /// Returns true if a terminal was seen.
    pub fn await_terminal(&self, timeout: Duration) -> bool {
        self.wait_until(timeout, |events| {
            events.iter().any(|r| r.notification.is_terminal())
        })
    }

    /// Block until at least `count` events arrived or `timeout` elapses
    pub fn await_events(&self, count: usize, timeout: Duration) -> bool {
        self.wait_until(timeout, |events| events.len() >= count)
    }

    fn wait_until<P>(&self, timeout: Duration, done: P) -> bool
    where
        P: Fn(&[Recorded<T>]) -> bool,
    {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock();
        while !done(&events) {
            if self.changed.wait_until(&mut events, deadline).timed_out() {
                return done(&events);
            }
        }
        true
    }
}

impl<T: Clone> TestObserver<T> {
    /// Snapshot of every event in arrival order
    pub fn notifications(&self) -> Vec<Notification<T>> {
        self.events
            .lock()
            .iter()
            .map(|r| r.notification.clone())
            .collect()
    }

    /// Snapshot of every event with its delivering thread
    pub fn recorded(&self) -> Vec<Recorded<T>> {
        self.events.lock().clone()
    }

    /// Items received, in order
    pub fn values(&self) -> Vec<T> {
        self.events
            .lock()
            .iter()
            .filter_map(|r| match &r.notification {
                Notification::Next(v) => Some(v.clone()),
                _ => None,
            })
            .collect()
    }
}

impl<T> Default for TestObserver<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send> Observer<T> for TestObserver<T> {
    fn on_next(&self, item: T) {
        self.record(Notification::Next(item));
    }

    fn on_error(&self, error: StreamError) {
        self.record(Notification::Error(error));
    }

    fn on_complete(&self) {
        self.record(Notification::Complete);
    }
}
