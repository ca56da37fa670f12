//! Side-effect probe.

use std::sync::Arc;

use crate::{event::Event, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Invokes `probe` with every event before forwarding it unchanged.
  /// Useful for logging a pipeline without altering it.
  pub fn tap(&self, probe: impl Fn(&Event<T>) + Send + Sync + 'static) -> Observable<T> {
    let source = self.clone();
    let probe = Arc::new(probe);
    Observable::create(move |sink: Sink<T>| {
      let probe = probe.clone();
      source.subscribe_event(move |event| {
        (*probe)(&event);
        sink.forward(event);
      })
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn probe_sees_every_event_without_changing_the_stream() {
    let probed = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let p = probed.clone();
    let log = seen.clone();
    Observable::from_iter(vec![1, 2])
      .tap(move |event| {
        p.lock().unwrap().push(match event {
          Event::Next(v) => format!("next {v}"),
          Event::Error(_) => "error".into(),
          Event::Completed => "completed".into(),
        });
      })
      .subscribe(move |v| log.lock().unwrap().push(v));

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert_eq!(*probed.lock().unwrap(), vec!["next 1", "next 2", "completed"]);
  }
}
