//! Per-subscription delivery core.
//!
//! A [`Sink`] sits between an upstream producer and one observer. It
//! serializes delivery, enforces the terminal contract (nothing after
//! `Error`/`Completed`, silently), releases upstream resources once a
//! terminal event has been delivered, and turns `dispose` into an immediate
//! stop signal.
//!
//! Serialization uses a queue-drain loop: the first emitter on a sink
//! becomes the drainer and delivers events outside the lock; emissions that
//! arrive concurrently — or re-entrantly from inside the observer callback —
//! are enqueued and drained in order. Re-entrant emission therefore cannot
//! deadlock and cannot interleave out of order.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use tracing::trace;

use crate::{
  disposable::{CompositeDisposable, Disposable},
  event::{Event, StreamError},
  observer::Observer,
};

pub struct Sink<T> {
  inner: Arc<SinkInner<T>>,
}

impl<T> Clone for Sink<T> {
  fn clone(&self) -> Self { Sink { inner: self.inner.clone() } }
}

struct SinkInner<T> {
  state: Mutex<SinkState<T>>,
  upstream: CompositeDisposable,
}

struct SinkState<T> {
  observer: Option<Box<dyn Observer<T>>>,
  queue: VecDeque<Event<T>>,
  draining: bool,
  done: bool,
}

impl<T: Send + 'static> Sink<T> {
  pub fn new(observer: impl Observer<T> + 'static) -> Self {
    Sink {
      inner: Arc::new(SinkInner {
        state: Mutex::new(SinkState {
          observer: Some(Box::new(observer)),
          queue: VecDeque::new(),
          draining: false,
          done: false,
        }),
        upstream: CompositeDisposable::new(),
      }),
    }
  }

  #[inline]
  pub fn next(&self, value: T) { self.forward(Event::Next(value)) }

  #[inline]
  pub fn error(&self, err: StreamError) { self.forward(Event::Error(err)) }

  #[inline]
  pub fn complete(&self) { self.forward(Event::Completed) }

  /// Delivers an event, honoring serialization and the terminal contract.
  pub fn forward(&self, event: Event<T>) {
    let mut state = self.inner.state.lock();
    if state.done {
      trace!("sink dropped event after terminal/disposal");
      return;
    }
    if state.draining {
      state.queue.push_back(event);
      return;
    }
    state.draining = true;
    let mut pending = Some(event);
    while let Some(event) = pending.take() {
      let terminal = event.is_terminal();
      if terminal {
        // Flagged before unlocking so racing emitters drop instead of queue.
        state.done = true;
        state.queue.clear();
      }
      let observer = state.observer.take();
      drop(state);
      let observer = observer.map(|mut observer| {
        observer.on_event(event);
        observer
      });
      if terminal {
        self.inner.upstream.dispose();
        self.inner.state.lock().draining = false;
        return;
      }
      state = self.inner.state.lock();
      if state.done {
        // Disposed from inside the callback or from another thread.
        state.queue.clear();
        state.draining = false;
        return;
      }
      state.observer = observer;
      pending = state.queue.pop_front();
    }
    state.draining = false;
  }

  /// Whether the sink still accepts events.
  pub fn is_active(&self) -> bool { !self.inner.state.lock().done }

  /// Registers upstream teardown to run on terminal delivery or disposal.
  pub fn attach(&self, disposable: Disposable) { self.inner.upstream.add(disposable) }

  /// Stops delivery immediately and releases all upstream resources.
  pub fn dispose(&self) {
    {
      let mut state = self.inner.state.lock();
      state.done = true;
      state.observer = None;
      state.queue.clear();
    }
    self.inner.upstream.dispose();
  }

  /// A handle whose disposal tears down this subscription.
  pub fn to_disposable(&self) -> Disposable {
    let sink = self.clone();
    Disposable::new(move || sink.dispose())
  }
}
