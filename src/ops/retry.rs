//! Resubscription on failure.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::debug;

use crate::{
  disposable::CompositeDisposable,
  event::{Event, StreamError},
  observable::Observable,
  sink::Sink,
  subject::PublishSubject,
};

impl<T: Send + 'static> Observable<T> {
  /// Resubscribes to the source on error, up to `max_retries` times; the
  /// last error is forwarded once the budget is spent.
  pub fn retry(&self, max_retries: usize) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      resubscribe(source.clone(), max_retries, sink, group.clone());
      group.into_disposable()
    })
  }

  /// Hands errors to `handler` as a stream; every element the handler
  /// stream emits grants one resubscription. When the handler stream
  /// errors that error is forwarded; when it completes, the stream
  /// completes (or re-raises the last source error if one is pending).
  pub fn retry_when<F>(&self, handler: F) -> Observable<T>
  where
    F: Fn(Observable<StreamError>) -> Observable<()> + Send + Sync + 'static,
  {
    let source = self.clone();
    let handler = Arc::new(handler);
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      let errors = PublishSubject::<StreamError>::new();
      let last_error = Arc::new(Mutex::new(None::<StreamError>));

      // The permission stream is wired first so a synchronous source error
      // reaches the handler.
      let permission = (*handler)(errors.as_observable());
      let retry_source = source.clone();
      let retry_sink = sink.clone();
      let retry_group = group.clone();
      let retry_errors = errors.clone();
      let pending = last_error.clone();
      group.add(permission.subscribe_event(move |event: Event<()>| match event {
        Event::Next(()) => {
          pending.lock().take();
          debug!("retrying source after handler permission");
          attempt(
            retry_source.clone(),
            retry_sink.clone(),
            retry_errors.clone(),
            pending.clone(),
            retry_group.clone(),
          );
        }
        Event::Error(e) => retry_sink.error(e),
        Event::Completed => {
          let unresolved = pending.lock().take();
          match unresolved {
            Some(e) => retry_sink.error(e),
            None => retry_sink.complete(),
          }
        }
      }));

      attempt(source.clone(), sink, errors, last_error, group.clone());
      group.into_disposable()
    })
  }
}

fn resubscribe<T: Send + 'static>(
  source: Observable<T>,
  budget: usize,
  sink: Sink<T>,
  group: CompositeDisposable,
) {
  let retry_source = source.clone();
  let retry_group = group.clone();
  let sub = source.subscribe_event(move |event| match event {
    Event::Error(e) => {
      if budget == 0 {
        sink.error(e);
      } else {
        debug!(retries_left = budget, error = %e, "retrying after upstream error");
        resubscribe(retry_source.clone(), budget - 1, sink.clone(), retry_group.clone());
      }
    }
    other => sink.forward(other),
  });
  group.add(sub);
}

/// One source attempt for `retry_when`: errors are parked and routed to the
/// handler instead of downstream.
fn attempt<T: Send + 'static>(
  source: Observable<T>,
  sink: Sink<T>,
  errors: PublishSubject<StreamError>,
  last_error: Arc<Mutex<Option<StreamError>>>,
  group: CompositeDisposable,
) {
  let sub = source.subscribe_event(move |event| match event {
    Event::Error(e) => {
      *last_error.lock() = Some(e.clone());
      errors.next(e);
    }
    other => sink.forward(other),
  });
  group.add(sub);
}
