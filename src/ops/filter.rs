//! Predicate filtering.

use std::sync::Arc;

use crate::{event::Event, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Forwards only elements for which `pred` returns true.
  pub fn filter(&self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Observable<T> {
    let source = self.clone();
    let pred = Arc::new(pred);
    Observable::create(move |sink: Sink<T>| {
      let pred = pred.clone();
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          if (*pred)(&v) {
            sink.next(v);
          }
        }
        other => sink.forward(other),
      })
    })
  }
}
