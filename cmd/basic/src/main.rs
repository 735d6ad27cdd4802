//! Basic rxlite example
//!
//! Runs each operator and scheduler once and prints every event with the
//! name of the thread that delivered it.
//!
//! # Environment Variables
//!
//! - `RXLITE_LOG=debug` - Log filter (falls back to `RUST_LOG`, then `info`)
//! - `RXLITE_THREAD_PREFIX=app` - Worker thread name prefix
//! - `RXLITE_COMPUTATION_THREADS=2` - Computation pool size

use rxlite::{observer_fn, Observable, Observer, SchedulerResult, StreamError, TestObserver};
use std::fmt::Debug;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// RXLITE_LOG=debug cargo run -p rxlite-basic
fn main() -> SchedulerResult<()> {
    rxlite::init_logging();
    println!("=== rxlite Basic Example ===\n");

    section("create / subscribe");
    Observable::<i32>::create(|observer| {
        observer.on_next(1);
        observer.on_next(2);
        observer.on_next(3);
        observer.on_complete();
    })
    .subscribe(printer::<i32>("create"));

    section("map");
    Observable::from_iter(1..=3)
        .map(|x| x * 10)
        .subscribe(printer::<i32>("map"));

    section("filter");
    Observable::from_iter(1..=6)
        .filter(|x| x % 2 == 0)
        .subscribe(printer::<i32>("filter"));

    section("flat_map");
    Observable::from_iter(vec!["a", "b"])
        .flat_map(|s| Observable::from_iter(vec![format!("{}1", s), format!("{}2", s)]))
        .subscribe(printer::<String>("flat_map"));

    section("error handling");
    Observable::from_iter(vec![4, 2, 0, 8])
        .try_map(|x: i32| {
            if x == 0 {
                Err("cannot divide by zero")
            } else {
                Ok(100 / x)
            }
        })
        .subscribe(printer::<i32>("try_map"));

    section("subscribe_on(io)");
    let done = Arc::new(TestObserver::new());
    Observable::from_iter(vec![1, 2, 3])
        .map(|x| x + 1)
        .subscribe_on(rxlite::io()?)
        .subscribe(Tee::new("subscribe_on", done.clone()));
    println!("  subscribe returned on {}", thread_name());
    wait(&done);

    section("observe_on(single)");
    let done = Arc::new(TestObserver::new());
    Observable::from_iter(vec![1, 2, 3])
        .observe_on(rxlite::single()?)
        .subscribe(Tee::new("observe_on", done.clone()));
    wait(&done);

    section("subscribe_on(computation) + observe_on(single)");
    let done = Arc::new(TestObserver::new());
    Observable::from_iter(1..=4)
        .map(|x| x * x)
        .subscribe_on(rxlite::computation()?)
        .observe_on(rxlite::single()?)
        .subscribe(Tee::new("both", done.clone()));
    wait(&done);

    println!("\n=== Done ===");
    Ok(())
}

fn section(title: &str) {
    println!("\n--- {} ---", title);
}

fn thread_name() -> String {
    thread::current().name().unwrap_or("<unnamed>").to_string()
}

fn printer<T: Debug>(label: &'static str) -> impl Observer<T> {
    observer_fn(
        move |item: T| println!("  [{}] next {:?} on {}", label, item, thread_name()),
        move |error: StreamError| println!("  [{}] error: {} on {}", label, error, thread_name()),
        move || println!("  [{}] complete on {}", label, thread_name()),
    )
}

fn wait<T>(done: &TestObserver<T>) {
    if !done.await_terminal(Duration::from_secs(5)) {
        tracing::warn!("timed out waiting for the stream to finish");
    }
}

/// Prints every event and forwards it to a recording observer
struct Tee<T> {
    label: &'static str,
    record: Arc<TestObserver<T>>,
}

impl<T> Tee<T> {
    fn new(label: &'static str, record: Arc<TestObserver<T>>) -> Self {
        Self { label, record }
    }
}

impl<T: Debug + Send> Observer<T> for Tee<T> {
    fn on_next(&self, item: T) {
        println!("  [{}] next {:?} on {}", self.label, item, thread_name());
        self.record.on_next(item);
    }

    fn on_error(&self, error: StreamError) {
        println!("  [{}] error: {} on {}", self.label, error, thread_name());
        self.record.on_error(error);
    }

    fn on_complete(&self) {
        println!("  [{}] complete on {}", self.label, thread_name());
        self.record.on_complete();
    }
}
