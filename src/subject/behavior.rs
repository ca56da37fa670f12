//! Latest-value subject.

use std::sync::Arc;

use crate::{
  disposable::Disposable,
  event::{Event, StreamError},
  observable::Observable,
  observer::Observer,
  subject::SubjectCore,
};

/// Always holds a current value: new subscribers immediately receive the
/// most recent emission, or the seed if nothing has been emitted yet.
pub struct BehaviorSubject<T> {
  core: Arc<SubjectCore<T>>,
}

impl<T> Clone for BehaviorSubject<T> {
  fn clone(&self) -> Self { BehaviorSubject { core: self.core.clone() } }
}

impl<T: Clone + Send + 'static> BehaviorSubject<T> {
  pub fn new(seed: T) -> Self {
    BehaviorSubject { core: SubjectCore::new(1, false, Some(seed)) }
  }

  /// The current value. Present from construction on; termination does not
  /// clear it.
  pub fn value(&self) -> T {
    self.core.latest().expect("behavior subject is seeded at construction")
  }

  pub fn next(&self, value: T) { self.core.push(Event::Next(value)) }

  pub fn error(&self, err: StreamError) { self.core.push(Event::Error(err)) }

  pub fn complete(&self) { self.core.push(Event::Completed) }

  pub fn is_terminated(&self) -> bool { self.core.is_terminated() }

  pub fn as_observable(&self) -> Observable<T> {
    let core = self.core.clone();
    Observable::create(move |sink| core.subscribe(sink))
  }

  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    self.as_observable().subscribe(next)
  }
}

impl<T: Clone + Send + 'static> Observer<T> for BehaviorSubject<T> {
  fn on_event(&mut self, event: Event<T>) { self.core.push(event) }
}
