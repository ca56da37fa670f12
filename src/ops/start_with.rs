//! Synchronous prefixing.

use crate::{observable::Observable, sink::Sink};

impl<T: Clone + Send + Sync + 'static> Observable<T> {
  /// Emits `values` in order at subscribe time, before anything from the
  /// source.
  pub fn start_with(&self, values: Vec<T>) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      for v in values.clone() {
        if !sink.is_active() {
          break;
        }
        sink.next(v);
      }
      source.raw_subscribe(sink)
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::subject::PublishSubject;

  #[test]
  fn prefix_arrives_before_source_events() {
    let subject = PublishSubject::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    subject
      .as_observable()
      .start_with(vec![1, 2])
      .subscribe(move |v| log.lock().unwrap().push(v));

    subject.next(3);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }
}
