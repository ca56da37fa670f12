//! Error recovery by substitution.

use std::sync::Arc;

use crate::{
  event::{Event, StreamError},
  observable::Observable,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Replaces an upstream error with the observable `handler` builds from
  /// it; elements before the error pass through untouched.
  pub fn catch_error_resume<F>(&self, handler: F) -> Observable<T>
  where
    F: Fn(StreamError) -> Observable<T> + Send + Sync + 'static,
  {
    let source = self.clone();
    let handler = Arc::new(handler);
    Observable::create(move |sink: Sink<T>| {
      let handler = handler.clone();
      source.subscribe_event(move |event| match event {
        Event::Error(e) => {
          let fallback = (*handler)(e);
          let teardown = fallback.raw_subscribe(sink.clone());
          sink.attach(teardown);
        }
        other => sink.forward(other),
      })
    })
  }

  /// Replaces an upstream error with a single value followed by completion.
  pub fn catch_error_return(&self, value: T) -> Observable<T>
  where
    T: Clone + Sync,
  {
    self.catch_error_resume(move |_| Observable::of(value.clone()))
  }
}
