//! Primary-driven sampling of a companion stream.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Emits `(primary, latest_of_other)` whenever the primary emits. If the
  /// companion has not emitted yet, the primary element is dropped. The
  /// companion's completion is irrelevant; its error propagates.
  pub fn with_latest_from<U>(&self, other: Observable<U>) -> Observable<(T, U)>
  where
    U: Clone + Send + 'static,
  {
    let primary = self.clone();
    let companion = other;
    Observable::create(move |sink: Sink<(T, U)>| {
      let latest = Arc::new(Mutex::new(None::<U>));
      let group = CompositeDisposable::new();
      let companion_handle = Upstream::<U>::new();

      let slot = latest.clone();
      let s = sink.clone();
      group.add(companion_handle.connect(&companion, move |event: Event<U>| match event {
        Event::Next(v) => *slot.lock() = Some(v),
        Event::Error(e) => s.error(e),
        Event::Completed => {}
      }));

      let cut_companion = companion_handle.clone();
      group.add(primary.subscribe_event(move |event| match event {
        Event::Next(v) => {
          let paired = latest.lock().clone();
          if let Some(u) = paired {
            sink.next((v, u));
          }
        }
        other => {
          sink.forward(other.retag());
          cut_companion.sever();
        }
      }));

      group.into_disposable()
    })
  }
}
