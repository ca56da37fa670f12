//! Whole-stream collection.

use crate::{event::Event, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Buffers every element and emits them as one `Vec` when the upstream
  /// completes. An upstream error discards the buffer.
  pub fn to_vec(&self) -> Observable<Vec<T>> {
    let source = self.clone();
    Observable::create(move |sink: Sink<Vec<T>>| {
      let mut buffer = Vec::new();
      source.subscribe_event(move |event| match event {
        Event::Next(v) => buffer.push(v),
        Event::Error(e) => sink.error(e),
        Event::Completed => {
          sink.next(std::mem::take(&mut buffer));
          sink.complete();
        }
      })
    })
  }
}
