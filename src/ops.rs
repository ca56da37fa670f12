//! Operator library.
//!
//! Every operator is a pure transformation of observables: it wraps the
//! upstream subscribe call and installs an intermediate observer that
//! applies its logic before forwarding downstream. All per-subscription
//! state is allocated inside the subscribe closure, so one operator chain
//! can back any number of independent subscriptions.

mod amb;
mod buffer;
mod catch_error;
mod collect;
mod combine_latest;
mod concat;
mod debounce;
mod delay;
mod distinct;
mod element_at;
mod filter;
mod flat_map;
mod map;
mod merge;
mod multicast;
mod observe_on;
mod retry;
mod scan;
mod skip;
mod start_with;
mod subscribe_on;
mod switch;
mod take;
mod tap;
mod timeout;
mod window;
mod with_latest_from;
mod zip;

pub use multicast::Connectable;

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{disposable::Disposable, observable::Observable, observer::Observer, sink::Sink};

/// Pre-registered handle to an upstream subscription's sink.
///
/// Operators that terminate downstream before upstream finishes (`take`,
/// `element_at`, `amb`, `timeout` with fallback, ...) sever through this
/// handle so a synchronous producer stops mid-emission instead of draining
/// to the end. The sink is registered before the source factory runs, which
/// is what makes severing effective during subscribe-time emission.
pub(crate) struct Upstream<T> {
  slot: Arc<Mutex<Option<Sink<T>>>>,
}

impl<T> Clone for Upstream<T> {
  fn clone(&self) -> Self { Upstream { slot: self.slot.clone() } }
}

impl<T: Send + 'static> Upstream<T> {
  pub fn new() -> Self { Upstream { slot: Arc::new(Mutex::new(None)) } }

  /// Subscribes `observer` to `source` through this handle.
  pub fn connect(
    &self,
    source: &Observable<T>,
    observer: impl Observer<T> + 'static,
  ) -> Disposable {
    let sink = Sink::new(observer);
    *self.slot.lock() = Some(sink.clone());
    let teardown = source.raw_subscribe(sink.clone());
    sink.attach(teardown);
    sink.to_disposable()
  }

  /// Cuts the upstream subscription. Idempotent.
  pub fn sever(&self) {
    let sink = self.slot.lock().take();
    if let Some(sink) = sink {
      sink.dispose();
    }
  }
}
