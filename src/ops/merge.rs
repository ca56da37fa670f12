//! Concurrent interleaving.

use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

use crate::{
  disposable::{CompositeDisposable, Disposable},
  event::Event,
  observable::Observable,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Subscribes to both sources at once and forwards elements as they
  /// arrive. Completes once both complete; errors the moment either errors.
  pub fn merge(&self, other: Observable<T>) -> Observable<T> {
    Observable::merge_all(vec![self.clone(), other])
  }

  /// `merge` over an arbitrary list of sources.
  pub fn merge_all(sources: Vec<Observable<T>>) -> Observable<T> {
    Observable::create(move |sink: Sink<T>| {
      if sources.is_empty() {
        sink.complete();
        return Disposable::empty();
      }
      let group = CompositeDisposable::new();
      let remaining = Arc::new(AtomicUsize::new(sources.len()));
      for source in sources.clone() {
        let sink = sink.clone();
        let remaining = remaining.clone();
        group.add(source.subscribe_event(move |event| match event {
          Event::Next(v) => sink.next(v),
          Event::Error(e) => sink.error(e),
          Event::Completed => {
            if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
              sink.complete();
            }
          }
        }));
      }
      group.into_disposable()
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::{event::StreamError, subject::PublishSubject};

  #[test]
  fn interleaves_and_completes_after_all() {
    let a = PublishSubject::new();
    let b = PublishSubject::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    a.as_observable().merge(b.as_observable()).subscribe_all(
      move |v| log.lock().unwrap().push(v),
      |_| {},
      move || *flag.lock().unwrap() = true,
    );

    a.next(1);
    b.next(10);
    a.next(2);
    a.complete();
    assert!(!*done.lock().unwrap()); // b still open
    b.next(11);
    b.complete();

    assert_eq!(*seen.lock().unwrap(), vec![1, 10, 2, 11]);
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn any_error_terminates_immediately() {
    let a = PublishSubject::new();
    let b = PublishSubject::new();
    let errors = Arc::new(Mutex::new(0));
    let errs = errors.clone();
    a.as_observable().merge(b.as_observable()).subscribe_all(
      |_: i32| {},
      move |_| *errs.lock().unwrap() += 1,
      || {},
    );

    a.error(StreamError::upstream("boom"));
    b.next(1); // dropped by the terminal gate
    assert_eq!(*errors.lock().unwrap(), 1);
  }
}
