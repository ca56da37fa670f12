//! Observer trait and closure adapters.
//!
//! An `Observer` is the consumer side of a stream. The single `on_event`
//! entry point keeps the trait object-safe; the three-handler decomposition
//! (`on_next` / `on_error` / `on_completed`) is provided by [`Callbacks`].

use crate::event::{Event, StreamError};

/// Consumes events from an observable.
pub trait Observer<T>: Send {
  fn on_event(&mut self, event: Event<T>);
}

/// Any `FnMut(Event<T>)` closure is an observer.
impl<T, F> Observer<T> for F
where
  F: FnMut(Event<T>) + Send,
{
  #[inline]
  fn on_event(&mut self, event: Event<T>) { self(event) }
}

/// Observer assembled from up to three optional handlers.
///
/// Handlers that are not installed ignore their events; in particular an
/// uninstalled error handler means errors are swallowed silently, which is
/// the documented contract for consumers that choose not to observe them.
pub struct Callbacks<T> {
  next: Option<Box<dyn FnMut(T) + Send>>,
  error: Option<Box<dyn FnMut(StreamError) + Send>>,
  completed: Option<Box<dyn FnMut() + Send>>,
}

impl<T> Default for Callbacks<T> {
  fn default() -> Self { Self::new() }
}

impl<T> Callbacks<T> {
  pub fn new() -> Self { Callbacks { next: None, error: None, completed: None } }

  pub fn on_next(mut self, f: impl FnMut(T) + Send + 'static) -> Self {
    self.next = Some(Box::new(f));
    self
  }

  pub fn on_error(mut self, f: impl FnMut(StreamError) + Send + 'static) -> Self {
    self.error = Some(Box::new(f));
    self
  }

  pub fn on_completed(mut self, f: impl FnMut() + Send + 'static) -> Self {
    self.completed = Some(Box::new(f));
    self
  }
}

impl<T: Send> Observer<T> for Callbacks<T> {
  fn on_event(&mut self, event: Event<T>) {
    match event {
      Event::Next(v) => {
        if let Some(next) = &mut self.next {
          next(v);
        }
      }
      Event::Error(e) => {
        if let Some(error) = &mut self.error {
          error(e);
        }
      }
      Event::Completed => {
        if let Some(completed) = &mut self.completed {
          completed();
        }
      }
    }
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn closure_is_an_observer() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let mut observer = move |event: Event<i32>| {
      if let Event::Next(v) = event {
        sink.lock().unwrap().push(v);
      }
    };
    observer.on_event(Event::Next(1));
    observer.on_event(Event::Next(2));
    observer.on_event(Event::Completed);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }

  #[test]
  fn callbacks_route_by_kind() {
    let nexts = Arc::new(Mutex::new(0));
    let completions = Arc::new(Mutex::new(0));
    let n = nexts.clone();
    let c = completions.clone();
    let mut observer = Callbacks::new()
      .on_next(move |_: i32| *n.lock().unwrap() += 1)
      .on_completed(move || *c.lock().unwrap() += 1);

    observer.on_event(Event::Next(10));
    observer.on_event(Event::Completed);
    // No error handler installed: errors are dropped, not raised.
    observer.on_event(Event::Error(StreamError::upstream("ignored")));

    assert_eq!(*nexts.lock().unwrap(), 1);
    assert_eq!(*completions.lock().unwrap(), 1);
  }
}
