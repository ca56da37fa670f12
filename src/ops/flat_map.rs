//! Inner-stream flattening.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  sink::Sink,
};

struct FlatState {
  outer_done: bool,
  inner_active: usize,
}

impl<T: Send + 'static> Observable<T> {
  /// Subscribes to every inner observable `f` produces and forwards all
  /// their elements concurrently. Earlier inners are never severed by later
  /// outer elements; the stream completes once the outer and every inner
  /// have completed.
  ///
  /// Inner subscription handles accumulate for the lifetime of the
  /// subscription; a long-lived pipeline over many short inners trades that
  /// growth for never cutting an inner off early.
  pub fn flat_map<U, F>(&self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(T) -> Observable<U> + Send + Sync + 'static,
  {
    let source = self.clone();
    let f = Arc::new(f);
    Observable::create(move |sink: Sink<U>| {
      let f = f.clone();
      let state = Arc::new(Mutex::new(FlatState { outer_done: false, inner_active: 0 }));
      let group = CompositeDisposable::new();

      let st = state.clone();
      let s = sink.clone();
      let inner_group = group.clone();
      group.add(source.subscribe_event(move |event: Event<T>| match event {
        Event::Next(v) => {
          st.lock().inner_active += 1;
          let inner = (*f)(v);
          let st = st.clone();
          let s = s.clone();
          inner_group.add(inner.subscribe_event(move |event: Event<U>| match event {
            Event::Next(u) => s.next(u),
            Event::Error(e) => s.error(e),
            Event::Completed => {
              let finish = {
                let mut st = st.lock();
                st.inner_active -= 1;
                st.outer_done && st.inner_active == 0
              };
              if finish {
                s.complete();
              }
            }
          }));
        }
        Event::Error(e) => s.error(e),
        Event::Completed => {
          let finish = {
            let mut st = st.lock();
            st.outer_done = true;
            st.inner_active == 0
          };
          if finish {
            s.complete();
          }
        }
      }));
      group.into_disposable()
    })
  }

  /// Like `flat_map`, but severs the previous inner the instant a new outer
  /// element arrives; only the newest inner is heard.
  pub fn flat_map_latest<U, F>(&self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(T) -> Observable<U> + Send + Sync + 'static,
  {
    self.map(f).switch_latest()
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex as StdMutex};

  use super::*;
  use crate::subject::PublishSubject;

  #[test]
  fn forwards_from_all_inners_concurrently() {
    let outer = PublishSubject::new();
    let first = PublishSubject::new();
    let second = PublishSubject::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();

    let inners = [first.clone(), second.clone()];
    outer
      .as_observable()
      .flat_map(move |i: usize| inners[i].as_observable())
      .subscribe(move |v| log.lock().unwrap().push(v));

    outer.next(0);
    first.next(1);
    outer.next(1);
    first.next(2); // earlier inner still alive
    second.next(10);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 10]);
  }

  #[test]
  fn completes_after_outer_and_all_inners() {
    let outer = PublishSubject::new();
    let inner = PublishSubject::new();
    let done = Arc::new(StdMutex::new(false));
    let flag = done.clone();

    let source = inner.clone();
    outer
      .as_observable()
      .flat_map(move |_: i32| source.as_observable())
      .subscribe_all(|_: i32| {}, |_| {}, move || *flag.lock().unwrap() = true);

    outer.next(1);
    outer.complete();
    assert!(!*done.lock().unwrap());
    inner.complete();
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn flat_map_latest_severs_the_previous_inner() {
    let outer = PublishSubject::new();
    let first = PublishSubject::new();
    let second = PublishSubject::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();

    let inners = [first.clone(), second.clone()];
    outer
      .as_observable()
      .flat_map_latest(move |i: usize| inners[i].as_observable())
      .subscribe(move |v| log.lock().unwrap().push(v));

    outer.next(0);
    first.next(1);
    outer.next(1);
    first.next(2); // severed
    second.next(10);
    assert_eq!(*seen.lock().unwrap(), vec![1, 10]);
  }
}
