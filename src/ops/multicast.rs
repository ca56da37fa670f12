//! Upstream sharing.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::Disposable,
  observable::Observable,
  sink::Sink,
  subject::SubjectCore,
};

/// A multicast observable whose single upstream subscription starts only
/// when [`connect`](Connectable::connect) is called.
///
/// Subscribers attach to an internal subject; `publish` variants replay
/// nothing, `replay(n)` variants catch late subscribers up with the last
/// `n` elements.
pub struct Connectable<T> {
  source: Observable<T>,
  core: Arc<SubjectCore<T>>,
  connection: Arc<Mutex<Option<Disposable>>>,
}

impl<T> Clone for Connectable<T> {
  fn clone(&self) -> Self {
    Connectable {
      source: self.source.clone(),
      core: self.core.clone(),
      connection: self.connection.clone(),
    }
  }
}

impl<T: Clone + Send + 'static> Connectable<T> {
  fn new(source: Observable<T>, core: Arc<SubjectCore<T>>) -> Self {
    Connectable { source, core, connection: Arc::new(Mutex::new(None)) }
  }

  /// Starts the upstream subscription. Calling again while connected
  /// returns the existing connection's handle.
  pub fn connect(&self) -> Disposable {
    if let Some(existing) = self.live_connection() {
      return existing;
    }
    let core = self.core.clone();
    let sub = self.source.subscribe_event(move |event| core.push(event));
    let mut slot = self.connection.lock();
    match &*slot {
      // Lost a connect race; keep the first connection.
      Some(existing) if !existing.is_disposed() => {
        let existing = existing.clone();
        drop(slot);
        sub.dispose();
        existing
      }
      _ => {
        *slot = Some(sub.clone());
        sub
      }
    }
  }

  fn live_connection(&self) -> Option<Disposable> {
    let slot = self.connection.lock();
    slot.as_ref().filter(|d| !d.is_disposed()).cloned()
  }

  pub fn as_observable(&self) -> Observable<T> {
    let core = self.core.clone();
    Observable::create(move |sink| core.subscribe(sink))
  }

  pub fn subscribe(&self, next: impl FnMut(T) + Send + 'static) -> Disposable {
    self.as_observable().subscribe(next)
  }
}

struct ShareState<T> {
  generation: Option<(Arc<SubjectCore<T>>, Disposable)>,
  subscribers: usize,
}

impl<T: Clone + Send + 'static> Observable<T> {
  /// Multicasts without replay; the upstream starts on `connect`.
  pub fn publish(&self) -> Connectable<T> {
    Connectable::new(self.clone(), SubjectCore::new(0, false, None))
  }

  /// Multicasts with a bounded replay buffer; the upstream starts on
  /// `connect` and late subscribers are caught up with the last
  /// `buffer_size` elements.
  pub fn replay(&self, buffer_size: usize) -> Connectable<T> {
    Connectable::new(self.clone(), SubjectCore::new(buffer_size, true, None))
  }

  /// Refcounted multicast: the first subscriber starts the single upstream
  /// subscription, later ones piggyback on it, and the upstream is torn
  /// down when the last detaches. After teardown or termination the next
  /// subscriber starts a fresh generation.
  pub fn share(&self) -> Observable<T> {
    let source = self.clone();
    let state = Arc::new(Mutex::new(ShareState::<T> { generation: None, subscribers: 0 }));
    Observable::create(move |sink: Sink<T>| {
      let (core, fresh) = {
        let mut state = state.lock();
        match &state.generation {
          Some((core, _)) if !core.is_terminated() => {
            let core = core.clone();
            state.subscribers += 1;
            (core, false)
          }
          _ => {
            let core = SubjectCore::new(0, false, None);
            state.generation = Some((core.clone(), Disposable::empty()));
            state.subscribers = 1;
            (core, true)
          }
        }
      };

      let detach = core.subscribe(sink);

      if fresh {
        let feeder = core.clone();
        let connection = source.subscribe_event(move |event| feeder.push(event));
        let mut state = state.lock();
        match &mut state.generation {
          Some((current, slot)) if Arc::ptr_eq(current, &core) => *slot = connection,
          _ => {
            drop(state);
            connection.dispose();
          }
        }
      }

      let state = state.clone();
      Disposable::new(move || {
        detach.dispose();
        let teardown = {
          let mut state = state.lock();
          match &state.generation {
            Some((current, connection)) if Arc::ptr_eq(current, &core) => {
              let connection = connection.clone();
              state.subscribers -= 1;
              if state.subscribers == 0 {
                state.generation = None;
                Some(connection)
              } else {
                None
              }
            }
            _ => None,
          }
        };
        if let Some(connection) = teardown {
          connection.dispose();
        }
      })
    })
  }
}
