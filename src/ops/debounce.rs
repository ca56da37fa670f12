//! Trailing-edge quiescence filtering.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
  disposable::{CompositeDisposable, SerialDisposable},
  event::Event,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Emits an element only once `duration` has elapsed with nothing newer;
  /// each arrival cancels the previous pending emission. On completion the
  /// pending element, if any, is flushed before the terminal event.
  pub fn debounce(&self, duration: Duration, scheduler: SchedulerRef) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let pending = Arc::new(Mutex::new(None::<T>));
      let timer = SerialDisposable::new();
      let group = CompositeDisposable::new();

      let scheduler = scheduler.clone();
      let slot = timer.clone();
      let held = pending.clone();
      group.add(source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          *held.lock() = Some(v);
          let held = held.clone();
          let sink = sink.clone();
          slot.replace(scheduler.schedule(
            Some(duration),
            Box::new(move || {
              let value = held.lock().take();
              if let Some(value) = value {
                sink.next(value);
              }
            }),
          ));
        }
        Event::Error(e) => sink.error(e),
        Event::Completed => {
          slot.dispose();
          let value = held.lock().take();
          if let Some(value) = value {
            sink.next(value);
          }
          sink.complete();
        }
      }));
      group.add(timer.into_disposable());
      group.into_disposable()
    })
  }

  /// The source material's name for trailing-edge debounce.
  pub fn throttle(&self, duration: Duration, scheduler: SchedulerRef) -> Observable<T> {
    self.debounce(duration, scheduler)
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex as StdMutex};

  use super::*;
  use crate::{scheduler::VirtualScheduler, subject::PublishSubject};

  #[test]
  fn only_the_last_of_a_burst_survives() {
    let subject = PublishSubject::new();
    let clock = VirtualScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    subject
      .as_observable()
      .debounce(Duration::from_secs(2), Arc::new(clock.clone()))
      .subscribe(move |v| log.lock().unwrap().push(v));

    subject.next(1);
    clock.advance_by(Duration::from_secs(1));
    subject.next(2); // cancels 1
    clock.advance_by(Duration::from_secs(2)); // quiet long enough
    subject.next(3);
    clock.advance_by(Duration::from_secs(2));
    assert_eq!(*seen.lock().unwrap(), vec![2, 3]);
  }

  #[test]
  fn completion_flushes_the_pending_element() {
    let subject = PublishSubject::new();
    let clock = VirtualScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let done = Arc::new(StdMutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    subject
      .as_observable()
      .debounce(Duration::from_secs(5), Arc::new(clock.clone()))
      .subscribe_all(
        move |v| log.lock().unwrap().push(v),
        |_| {},
        move || *flag.lock().unwrap() = true,
      );

    subject.next(7);
    subject.complete();
    assert_eq!(*seen.lock().unwrap(), vec![7]);
    assert!(*done.lock().unwrap());
  }
}
