//! The core observable handle and subscription entry points.
//!
//! An [`Observable`] wraps a subscribe function that runs once per
//! subscription (cold by default): it receives a fresh [`Sink`] for the new
//! observer and returns the teardown for whatever resources it allocated.
//! Multicasting is opt-in via `publish`/`replay`/`share` (see `ops`).

use std::sync::Arc;

use crate::{
  disposable::Disposable,
  event::{Event, StreamError},
  observer::{Callbacks, Observer},
  sink::Sink,
};

mod defer;
mod from_iter;
mod interval;
mod of;
mod trivial;

type SubscribeFn<T> = dyn Fn(Sink<T>) -> Disposable + Send + Sync;

pub struct Observable<T> {
  on_subscribe: Arc<SubscribeFn<T>>,
}

impl<T> Clone for Observable<T> {
  fn clone(&self) -> Self { Observable { on_subscribe: self.on_subscribe.clone() } }
}

impl<T: Send + 'static> Observable<T> {
  /// General escape hatch: build an observable from a subscribe function.
  ///
  /// The function is invoked once per subscription with the subscriber's
  /// sink and returns the teardown for the resources it allocated. Events
  /// pushed after a terminal event are dropped by the sink, so a sloppy
  /// factory cannot violate the terminal contract downstream.
  pub fn create(on_subscribe: impl Fn(Sink<T>) -> Disposable + Send + Sync + 'static) -> Self {
    Observable { on_subscribe: Arc::new(on_subscribe) }
  }

  /// Subscribes with a full observer. Returns the subscription handle.
  pub fn subscribe_observer(&self, observer: impl Observer<T> + 'static) -> Disposable {
    let sink = Sink::new(observer);
    let teardown = self.on_subscribe.as_ref()(sink.clone());
    sink.attach(teardown);
    sink.to_disposable()
  }

  /// Subscribes with a raw event closure.
  pub fn subscribe_event(&self, f: impl FnMut(Event<T>) + Send + 'static) -> Disposable {
    self.subscribe_observer(f)
  }

  /// Subscribes with a next handler only; errors and completion are ignored.
  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    let mut next = next;
    self.subscribe_event(move |event| {
      if let Event::Next(v) = event {
        next(v);
      }
    })
  }

  /// Subscribes with the three-handler decomposition.
  pub fn subscribe_all(
    &self,
    next: impl FnMut(T) + Send + 'static,
    error: impl FnMut(StreamError) + Send + 'static,
    completed: impl FnMut() + Send + 'static,
  ) -> Disposable {
    self.subscribe_observer(
      Callbacks::new()
        .on_next(next)
        .on_error(error)
        .on_completed(completed),
    )
  }

  /// Runs the subscribe function against an existing sink, without wrapping
  /// a fresh gate around it. Operator plumbing only.
  pub(crate) fn raw_subscribe(&self, sink: Sink<T>) -> Disposable {
    self.on_subscribe.as_ref()(sink)
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn create_routes_events_to_observer() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let completions = Arc::new(Mutex::new(0));
    let done = completions.clone();

    Observable::create(|sink: Sink<i32>| {
      sink.next(1);
      sink.next(2);
      sink.next(3);
      sink.complete();
      sink.next(4); // must never be seen
      Disposable::empty()
    })
    .subscribe_all(
      move |v| log.lock().unwrap().push(v),
      |_| {},
      move || *done.lock().unwrap() += 1,
    );

    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    assert_eq!(*completions.lock().unwrap(), 1);
  }

  #[test]
  fn each_subscription_replays_cold_source() {
    let source = Observable::create(|sink: Sink<i32>| {
      for v in [1, 2, 3] {
        sink.next(v);
      }
      sink.complete();
      Disposable::empty()
    });

    for _ in 0..2 {
      let seen = Arc::new(Mutex::new(Vec::new()));
      let log = seen.clone();
      source.subscribe(move |v| log.lock().unwrap().push(v));
      assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
  }

  #[test]
  fn teardown_runs_on_dispose() {
    let torn_down = Arc::new(Mutex::new(false));
    let flag = torn_down.clone();
    let source = Observable::create(move |_sink: Sink<i32>| {
      let flag = flag.clone();
      Disposable::new(move || *flag.lock().unwrap() = true)
    });
    let sub = source.subscribe(|_| {});
    assert!(!*torn_down.lock().unwrap());
    sub.dispose();
    assert!(*torn_down.lock().unwrap());
  }

  #[test]
  fn teardown_runs_even_after_synchronous_completion() {
    let torn_down = Arc::new(Mutex::new(false));
    let flag = torn_down.clone();
    let source = Observable::create(move |sink: Sink<i32>| {
      sink.complete();
      let flag = flag.clone();
      Disposable::new(move || *flag.lock().unwrap() = true)
    });
    source.subscribe(|_| {});
    assert!(*torn_down.lock().unwrap());
  }
}
