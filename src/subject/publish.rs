//! Fire-and-forget subject: no replay.

use std::sync::Arc;

use crate::{
  disposable::Disposable,
  event::{Event, StreamError},
  observable::Observable,
  observer::Observer,
  subject::SubjectCore,
};

/// Multicasts events to whoever is subscribed at emission time; subscribers
/// never see anything emitted before they attached.
pub struct PublishSubject<T> {
  core: Arc<SubjectCore<T>>,
}

impl<T> Clone for PublishSubject<T> {
  fn clone(&self) -> Self { PublishSubject { core: self.core.clone() } }
}

impl<T: Clone + Send + 'static> Default for PublishSubject<T> {
  fn default() -> Self { Self::new() }
}

impl<T: Clone + Send + 'static> PublishSubject<T> {
  pub fn new() -> Self { PublishSubject { core: SubjectCore::new(0, false, None) } }

  pub fn next(&self, value: T) { self.core.push(Event::Next(value)) }

  pub fn error(&self, err: StreamError) { self.core.push(Event::Error(err)) }

  pub fn complete(&self) { self.core.push(Event::Completed) }

  pub fn is_terminated(&self) -> bool { self.core.is_terminated() }

  /// The subject's consumer face; subscribe as with any observable.
  pub fn as_observable(&self) -> Observable<T> {
    let core = self.core.clone();
    Observable::create(move |sink| core.subscribe(sink))
  }

  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    self.as_observable().subscribe(next)
  }
}

/// A subject can stand in for an observer, bridging one stream into another.
impl<T: Clone + Send + 'static> Observer<T> for PublishSubject<T> {
  fn on_event(&mut self, event: Event<T>) { self.core.push(event) }
}
