//! Inner-stream switching.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::{CompositeDisposable, SerialDisposable},
  event::Event,
  observable::Observable,
  sink::Sink,
};

struct SwitchState {
  outer_done: bool,
  inner_live: bool,
  // Generation of the currently-live inner; a stale inner's completion
  // must not clear the flag for its replacement.
  generation: u64,
}

impl<T: Send + 'static> Observable<Observable<T>> {
  /// Forwards events only from the most recently emitted inner observable,
  /// severing the previous inner the instant a new one arrives. Completes
  /// once the outer has completed and the last inner has too.
  pub fn switch_latest(&self) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let state = Arc::new(Mutex::new(SwitchState {
        outer_done: false,
        inner_live: false,
        generation: 0,
      }));
      let inner_slot = SerialDisposable::new();
      let group = CompositeDisposable::new();

      let st = state.clone();
      let s = sink.clone();
      let slot = inner_slot.clone();
      group.add(source.subscribe_event(move |event: Event<Observable<T>>| match event {
        Event::Next(inner) => {
          let generation = {
            let mut st = st.lock();
            st.generation += 1;
            st.inner_live = true;
            st.generation
          };
          let st = st.clone();
          let s = s.clone();
          let sub = inner.subscribe_event(move |event: Event<T>| match event {
            Event::Next(v) => s.next(v),
            Event::Error(e) => s.error(e),
            Event::Completed => {
              let finish = {
                let mut st = st.lock();
                if st.generation != generation {
                  return;
                }
                st.inner_live = false;
                st.outer_done
              };
              if finish {
                s.complete();
              }
            }
          });
          // Replacing severs the previous inner subscription.
          slot.replace(sub);
        }
        Event::Error(e) => s.error(e),
        Event::Completed => {
          let finish = {
            let mut st = st.lock();
            st.outer_done = true;
            !st.inner_live
          };
          if finish {
            s.complete();
          }
        }
      }));
      group.add(inner_slot.into_disposable());
      group.into_disposable()
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex as StdMutex};

  use super::*;
  use crate::subject::PublishSubject;

  #[test]
  fn only_the_newest_inner_is_heard() {
    let outer = PublishSubject::<Observable<i32>>::new();
    let first = PublishSubject::new();
    let second = PublishSubject::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    outer
      .as_observable()
      .switch_latest()
      .subscribe(move |v| log.lock().unwrap().push(v));

    outer.next(first.as_observable());
    first.next(1);
    outer.next(second.as_observable());
    first.next(2); // severed, never seen
    second.next(10);
    assert_eq!(*seen.lock().unwrap(), vec![1, 10]);
  }

  #[test]
  fn completes_after_outer_and_last_inner() {
    let outer = PublishSubject::<Observable<i32>>::new();
    let inner = PublishSubject::new();
    let done = Arc::new(StdMutex::new(false));
    let flag = done.clone();
    outer
      .as_observable()
      .switch_latest()
      .subscribe_all(|_| {}, |_| {}, move || *flag.lock().unwrap() = true);

    outer.next(inner.as_observable());
    outer.complete();
    assert!(!*done.lock().unwrap()); // inner still open
    inner.complete();
    assert!(*done.lock().unwrap());
  }
}
