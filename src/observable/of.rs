//! Single-value sources.

use crate::{disposable::Disposable, observable::Observable, sink::Sink};

impl<T: Clone + Send + Sync + 'static> Observable<T> {
  /// Emits one value, then completes. Finite sequences go through
  /// [`Observable::from_iter`].
  pub fn of(value: T) -> Self {
    Observable::create(move |sink: Sink<T>| {
      sink.next(value.clone());
      sink.complete();
      Disposable::empty()
    })
  }

  /// Alias for [`Observable::of`].
  #[inline]
  pub fn just(value: T) -> Self { Observable::of(value) }
}
