//! Consecutive-duplicate suppression.

use std::sync::Arc;

use crate::{event::Event, observable::Observable, sink::Sink};

impl<T: Clone + Send + 'static> Observable<T> {
  /// Drops an element equal to the immediately preceding forwarded element.
  /// Earlier, non-adjacent duplicates are forwarded again.
  pub fn distinct_until_changed(&self) -> Observable<T>
  where
    T: PartialEq,
  {
    self.distinct_until_changed_by(|a, b| a == b)
  }

  /// `distinct_until_changed` under a caller-supplied equality.
  pub fn distinct_until_changed_by(
    &self,
    eq: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
  ) -> Observable<T> {
    let source = self.clone();
    let eq = Arc::new(eq);
    Observable::create(move |sink: Sink<T>| {
      let eq = eq.clone();
      let mut last: Option<T> = None;
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          let changed = last.as_ref().map_or(true, |prev| !(*eq)(prev, &v));
          if changed {
            last = Some(v.clone());
            sink.next(v);
          }
        }
        other => sink.forward(other),
      })
    })
  }
}
