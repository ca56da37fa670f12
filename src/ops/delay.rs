//! Fixed-shift time displacement.

use std::time::Duration;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Shifts every element and the completion by `duration` on `scheduler`.
  /// Errors jump the queue and terminate immediately.
  pub fn delay(&self, duration: Duration, scheduler: SchedulerRef) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      let timers = CompositeDisposable::new();

      let scheduler = scheduler.clone();
      let pending = timers.clone();
      group.add(source.subscribe_event(move |event| match event {
        Event::Error(e) => sink.error(e),
        event => {
          let sink = sink.clone();
          pending.add(scheduler.schedule(
            Some(duration),
            Box::new(move || sink.forward(event)),
          ));
        }
      }));
      group.add(timers.into_disposable());
      group.into_disposable()
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex as StdMutex};

  use super::*;
  use crate::{scheduler::VirtualScheduler, subject::PublishSubject};

  #[test]
  fn elements_arrive_shifted_in_order() {
    let subject = PublishSubject::new();
    let clock = VirtualScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let done = Arc::new(StdMutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    subject
      .as_observable()
      .delay(Duration::from_secs(5), Arc::new(clock.clone()))
      .subscribe_all(
        move |v| log.lock().unwrap().push(v),
        |_| {},
        move || *flag.lock().unwrap() = true,
      );

    subject.next(1);
    clock.advance_by(Duration::from_secs(1));
    subject.next(2);
    subject.complete();

    assert!(seen.lock().unwrap().is_empty());
    clock.advance_by(Duration::from_secs(4)); // t=5: first element due
    assert_eq!(*seen.lock().unwrap(), vec![1]);
    clock.advance_by(Duration::from_secs(1)); // t=6: second + completion
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn disposal_cancels_undelivered_elements() {
    let subject = PublishSubject::new();
    let clock = VirtualScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    let sub = subject
      .as_observable()
      .delay(Duration::from_secs(5), Arc::new(clock.clone()))
      .subscribe(move |v: i32| log.lock().unwrap().push(v));

    subject.next(1);
    sub.dispose();
    clock.advance_by(Duration::from_secs(5));
    assert!(seen.lock().unwrap().is_empty());
  }
}
