//! Positional selection and element suppression.

use crate::{event::Event, observable::Observable, ops::Upstream, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Emits only the element at `index` (0-based), then completes. If the
  /// source completes earlier, completes without a value.
  pub fn element_at(&self, index: usize) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let upstream = Upstream::new();
      let cut = upstream.clone();
      let mut seen = 0usize;
      upstream.connect(&source, move |event: Event<T>| match event {
        Event::Next(v) => {
          if seen == index {
            sink.next(v);
            sink.complete();
            cut.sever();
          } else {
            seen += 1;
          }
        }
        other => sink.forward(other),
      })
    })
  }

  /// Suppresses all elements; only the terminal event comes through.
  pub fn ignore_elements(&self) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      source.subscribe_event(move |event| {
        if event.is_terminal() {
          sink.forward(event);
        }
      })
    })
  }
}
