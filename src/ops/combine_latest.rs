//! Latest-value combination.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  sink::Sink,
};

struct Latest<T, U> {
  a: Option<T>,
  b: Option<U>,
  a_done: bool,
  b_done: bool,
}

impl<T: Clone + Send + 'static> Observable<T> {
  /// Emits `selector(a, b)` every time either source emits, once both have
  /// emitted at least once. Completes when both complete; errors the moment
  /// either errors.
  pub fn combine_latest<U, R, F>(&self, other: Observable<U>, selector: F) -> Observable<R>
  where
    U: Clone + Send + 'static,
    R: Send + 'static,
    F: Fn(T, U) -> R + Send + Sync + 'static,
  {
    let a_source = self.clone();
    let b_source = other;
    let selector = Arc::new(selector);
    Observable::create(move |sink: Sink<R>| {
      let state = Arc::new(Mutex::new(Latest::<T, U> {
        a: None,
        b: None,
        a_done: false,
        b_done: false,
      }));
      let group = CompositeDisposable::new();

      let st = state.clone();
      let s = sink.clone();
      let f = selector.clone();
      group.add(a_source.subscribe_event(move |event: Event<T>| match event {
        Event::Next(v) => {
          let pair = {
            let mut st = st.lock();
            st.a = Some(v);
            match (&st.a, &st.b) {
              (Some(a), Some(b)) => Some((a.clone(), b.clone())),
              _ => None,
            }
          };
          if let Some((a, b)) = pair {
            s.next((*f)(a, b));
          }
        }
        Event::Error(e) => s.error(e),
        Event::Completed => {
          let both_done = {
            let mut st = st.lock();
            st.a_done = true;
            st.b_done
          };
          if both_done {
            s.complete();
          }
        }
      }));

      let st = state.clone();
      let s = sink.clone();
      let f = selector.clone();
      group.add(b_source.subscribe_event(move |event: Event<U>| match event {
        Event::Next(v) => {
          let pair = {
            let mut st = st.lock();
            st.b = Some(v);
            match (&st.a, &st.b) {
              (Some(a), Some(b)) => Some((a.clone(), b.clone())),
              _ => None,
            }
          };
          if let Some((a, b)) = pair {
            s.next((*f)(a, b));
          }
        }
        Event::Error(e) => s.error(e),
        Event::Completed => {
          let both_done = {
            let mut st = st.lock();
            st.b_done = true;
            st.a_done
          };
          if both_done {
            s.complete();
          }
        }
      }));

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
  fn waits_for_both_then_emits_on_every_change() {
    let a = PublishSubject::new();
    let b = PublishSubject::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    a.as_observable()
      .combine_latest(b.as_observable(), |x: i32, y: &str| format!("{x}{y}"))
      .subscribe(move |v| log.lock().unwrap().push(v));

    a.next(1);
    assert!(seen.lock().unwrap().is_empty()); // b has not emitted yet
    b.next("a");
    a.next(2);
    b.next("b");
    assert_eq!(*seen.lock().unwrap(), vec!["1a", "2a", "2b"]);
  }

  #[test]
  fn completes_only_after_both_complete() {
    let a = PublishSubject::new();
    let b = PublishSubject::new();
    let done = Arc::new(StdMutex::new(false));
    let flag = done.clone();
    a.as_observable()
      .combine_latest(b.as_observable(), |x: i32, y: i32| x + y)
      .subscribe_all(|_| {}, |_| {}, move || *flag.lock().unwrap() = true);

    a.complete();
    assert!(!*done.lock().unwrap());
    b.complete();
    assert!(*done.lock().unwrap());
  }
}
