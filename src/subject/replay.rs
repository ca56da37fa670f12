//! Bounded-replay subject.

use std::sync::Arc;

use crate::{
  disposable::Disposable,
  event::{Event, StreamError},
  observable::Observable,
  observer::Observer,
  subject::SubjectCore,
};

/// Buffers the last up to `n` values and replays them to every new
/// subscriber, even after termination (followed by the terminal event).
pub struct ReplaySubject<T> {
  core: Arc<SubjectCore<T>>,
}

impl<T> Clone for ReplaySubject<T> {
  fn clone(&self) -> Self { ReplaySubject { core: self.core.clone() } }
}

impl<T: Clone + Send + 'static> ReplaySubject<T> {
  pub fn new(buffer_size: usize) -> Self {
    ReplaySubject { core: SubjectCore::new(buffer_size, true, None) }
  }

  pub fn next(&self, value: T) { self.core.push(Event::Next(value)) }

  pub fn error(&self, err: StreamError) { self.core.push(Event::Error(err)) }

  pub fn complete(&self) { self.core.push(Event::Completed) }

  pub fn is_terminated(&self) -> bool { self.core.is_terminated() }

  pub fn as_observable(&self) -> Observable<T> {
    let core = self.core.clone();
    Observable::create(move |sink| core.subscribe(sink))
  }

  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    self.as_observable().subscribe(next)
  }
}

impl<T: Clone + Send + 'static> Observer<T> for ReplaySubject<T> {
  fn on_event(&mut self, event: Event<T>) { self.core.push(event) }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn replays_only_the_last_n() {
    let subject = ReplaySubject::new(2);
    for v in [1, 2, 3, 4] {
      subject.next(v);
    }

    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    subject.subscribe(move |v| log.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![3, 4]);

    subject.next(5);
    assert_eq!(*seen.lock().unwrap(), vec![3, 4, 5]);
  }

  #[test]
  fn replays_buffer_then_terminal_after_completion() {
    let subject = ReplaySubject::new(2);
    subject.next(1);
    subject.next(2);
    subject.complete();

    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    subject.as_observable().subscribe_all(
      move |v| log.lock().unwrap().push(v),
      |_| {},
      move || *flag.lock().unwrap() = true,
    );

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(*done.lock().unwrap());
  }
}
