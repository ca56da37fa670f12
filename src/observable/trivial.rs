//! `empty`, `never`, and `throw`.

use crate::{disposable::Disposable, event::StreamError, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Emits nothing and completes immediately.
  pub fn empty() -> Self {
    Observable::create(|sink: Sink<T>| {
      sink.complete();
      Disposable::empty()
    })
  }

  /// Emits nothing and never terminates.
  pub fn never() -> Self { Observable::create(|_sink: Sink<T>| Disposable::empty()) }

  /// Fails immediately with the given error.
  pub fn throw(err: StreamError) -> Self {
    Observable::create(move |sink: Sink<T>| {
      sink.error(err.clone());
      Disposable::empty()
    })
  }
}
