//! Subscribe-time deferred construction.

use std::sync::Arc;

use crate::{observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Defers building the source until subscribe time; the factory runs
  /// afresh for every subscription.
  pub fn defer(factory: impl Fn() -> Observable<T> + Send + Sync + 'static) -> Self {
    let factory = Arc::new(factory);
    Observable::create(move |sink: Sink<T>| {
      let source = (*factory)();
      source.raw_subscribe(sink)
    })
  }
}
