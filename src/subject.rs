//! Hot, imperative event sources.
//!
//! A subject is both an observable and an explicit emitter: producers call
//! `next`/`error`/`complete` on it, and any number of observers subscribe to
//! the stream it multicasts. The four variants differ only in what a new
//! subscriber is caught up with:
//!
//! - [`PublishSubject`] — nothing, only events emitted after subscribing;
//! - [`BehaviorSubject`] — the most recent value (or the seed);
//! - [`ReplaySubject`] — the last up to `n` values;
//! - [`Variable`] — like Behavior, but error-free and auto-completing when
//!   its last owning handle drops.
//!
//! All variants share one terminal state machine: once `Error` or
//! `Completed` is accepted, every attached observer receives it, every later
//! subscriber immediately receives the stored terminal event, and further
//! `next` calls are silently dropped.

use std::{
  collections::VecDeque,
  sync::{Arc, Weak},
};

use parking_lot::Mutex;
use tracing::trace;

use crate::{disposable::Disposable, event::Event, sink::Sink};

mod behavior;
mod publish;
mod replay;
mod variable;

pub use behavior::BehaviorSubject;
pub use publish::PublishSubject;
pub use replay::ReplaySubject;
pub use variable::Variable;

/// State shared by every subject variant.
///
/// `capacity` is the replay buffer size (0 for publish, 1 for behavior,
/// `n` for replay). `replay_after_terminal` controls whether a subscriber
/// arriving after termination still receives the buffer before the stored
/// terminal event; only the replay variant does.
pub(crate) struct SubjectCore<T> {
  capacity: usize,
  replay_after_terminal: bool,
  state: Mutex<CoreState<T>>,
}

struct CoreState<T> {
  observers: Vec<(u64, Sink<T>)>,
  buffer: VecDeque<T>,
  terminal: Option<Event<T>>,
  next_id: u64,
}

impl<T: Clone + Send + 'static> SubjectCore<T> {
  pub fn new(capacity: usize, replay_after_terminal: bool, seed: Option<T>) -> Arc<Self> {
    let mut buffer = VecDeque::new();
    if let Some(seed) = seed {
      buffer.push_back(seed);
    }
    Arc::new(SubjectCore {
      capacity,
      replay_after_terminal,
      state: Mutex::new(CoreState {
        observers: Vec::new(),
        buffer,
        terminal: None,
        next_id: 0,
      }),
    })
  }

  /// Accepts one event and multicasts it to the current observers.
  ///
  /// Delivery happens against a snapshot of the observer list taken under
  /// the lock, so an observer attached or detached concurrently either sees
  /// the whole event or none of it. A terminal event detaches everyone.
  pub fn push(&self, event: Event<T>) {
    let targets: Vec<Sink<T>> = {
      let mut state = self.state.lock();
      if state.terminal.is_some() {
        trace!("subject dropped event after terminal");
        return;
      }
      match &event {
        Event::Next(value) => {
          if self.capacity > 0 {
            if state.buffer.len() == self.capacity {
              state.buffer.pop_front();
            }
            state.buffer.push_back(value.clone());
          }
          state.observers.iter().map(|(_, sink)| sink.clone()).collect()
        }
        _ => {
          state.terminal = Some(event.clone());
          std::mem::take(&mut state.observers)
            .into_iter()
            .map(|(_, sink)| sink)
            .collect()
        }
      }
    };
    for sink in targets {
      sink.forward(event.clone());
    }
  }

  /// Most recently buffered value, if any.
  pub fn latest(&self) -> Option<T> { self.state.lock().buffer.back().cloned() }

  pub fn is_terminated(&self) -> bool { self.state.lock().terminal.is_some() }

  /// Attaches `sink`, replaying per the variant's rule. The returned
  /// disposable detaches this observer without touching its siblings.
  pub fn subscribe(self: &Arc<Self>, sink: Sink<T>) -> Disposable {
    enum Outcome<T> {
      Attached(u64, Weak<SubjectCore<T>>),
      Terminated(Event<T>),
    }

    let (replay, outcome) = {
      let mut state = self.state.lock();
      match &state.terminal {
        Some(terminal) => {
          let replay = if self.replay_after_terminal {
            state.buffer.iter().cloned().collect()
          } else {
            Vec::new()
          };
          (replay, Outcome::Terminated(terminal.clone()))
        }
        None => {
          let id = state.next_id;
          state.next_id += 1;
          state.observers.retain(|(_, sink)| sink.is_active());
          state.observers.push((id, sink.clone()));
          let replay = state.buffer.iter().cloned().collect::<Vec<_>>();
          (replay, Outcome::Attached(id, Arc::downgrade(self)))
        }
      }
    };

    for value in replay {
      sink.next(value);
    }
    match outcome {
      Outcome::Terminated(event) => {
        sink.forward(event);
        Disposable::empty()
      }
      Outcome::Attached(id, core) => Disposable::new(move || {
        if let Some(core) = core.upgrade() {
          core.state.lock().observers.retain(|(entry, _)| *entry != id);
        }
      }),
    }
  }
}
