//! Mutable-value wrapper over a behavior stream.

use std::sync::Arc;

use crate::{
  disposable::{Disposable, ScopedDisposable},
  event::Event,
  observable::Observable,
  subject::SubjectCore,
};

/// A mutable cell whose changes are observable.
///
/// `Variable` never carries errors and cannot be completed by hand; the
/// stream completes automatically when the last owning handle drops. Clones
/// share ownership, but observables obtained from [`as_observable`] do not
/// keep the variable alive.
///
/// [`as_observable`]: Variable::as_observable
pub struct Variable<T> {
  core: Arc<SubjectCore<T>>,
  owner: Arc<ScopedDisposable>,
}

impl<T> Clone for Variable<T> {
  fn clone(&self) -> Self {
    Variable { core: self.core.clone(), owner: self.owner.clone() }
  }
}

impl<T: Clone + Send + 'static> Variable<T> {
  pub fn new(initial: T) -> Self {
    let core = SubjectCore::new(1, false, Some(initial));
    let completer = core.clone();
    let owner = Arc::new(ScopedDisposable::new(Disposable::new(move || {
      completer.push(Event::Completed);
    })));
    Variable { core, owner }
  }

  /// Current value.
  pub fn value(&self) -> T {
    self.core.latest().expect("variable is seeded at construction")
  }

  /// Stores a new value and emits it to all observers.
  pub fn set(&self, value: T) { self.core.push(Event::Next(value)) }

  /// Observes the current value immediately, then every change.
  pub fn as_observable(&self) -> Observable<T> {
    let core = self.core.clone();
    Observable::create(move |sink| core.subscribe(sink))
  }

  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    self.as_observable().subscribe(next)
  }
}
