//! Index-aligned pairing.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

struct Queues<T, U> {
  a: VecDeque<T>,
  b: VecDeque<U>,
  a_done: bool,
  b_done: bool,
}

impl<T, U> Queues<T, U> {
  /// A source that completed with nothing left to pair ends the zip.
  fn exhausted(&self) -> bool {
    (self.a_done && self.a.is_empty()) || (self.b_done && self.b.is_empty())
  }
}

impl<T: Send + 'static> Observable<T> {
  /// Pairs the i-th element of the source with the i-th element of `other`.
  /// Ends permanently once either side completes with no unpaired elements
  /// left.
  pub fn zip<U, R, F>(&self, other: Observable<U>, selector: F) -> Observable<R>
  where
    U: Send + 'static,
    R: Send + 'static,
    F: Fn(T, U) -> R + Send + Sync + 'static,
  {
    let a_source = self.clone();
    let b_source = other;
    let selector = Arc::new(selector);
    Observable::create(move |sink: Sink<R>| {
      let state = Arc::new(Mutex::new(Queues::<T, U> {
        a: VecDeque::new(),
        b: VecDeque::new(),
        a_done: false,
        b_done: false,
      }));
      let group = CompositeDisposable::new();
      let up_a = Upstream::<T>::new();
      let up_b = Upstream::<U>::new();

      let st = state.clone();
      let s = sink.clone();
      let f = selector.clone();
      let rival = up_b.clone();
      group.add(up_a.connect(&a_source, move |event: Event<T>| match event {
        Event::Next(v) => {
          let (pair, ended) = {
            let mut st = st.lock();
            st.a.push_back(v);
            let pair = if !st.a.is_empty() && !st.b.is_empty() {
              Some((st.a.pop_front(), st.b.pop_front()))
            } else {
              None
            };
            (pair, st.exhausted())
          };
          if let Some((Some(a), Some(b))) = pair {
            s.next((*f)(a, b));
          }
          if ended {
            s.complete();
            rival.sever();
          }
        }
        Event::Error(e) => {
          s.error(e);
          rival.sever();
        }
        Event::Completed => {
          let ended = {
            let mut st = st.lock();
            st.a_done = true;
            st.exhausted()
          };
          if ended {
            s.complete();
            rival.sever();
          }
        }
      }));

      if sink.is_active() {
        let st = state.clone();
        let s = sink.clone();
        let f = selector.clone();
        let rival = up_a.clone();
        group.add(up_b.connect(&b_source, move |event: Event<U>| match event {
          Event::Next(v) => {
            let (pair, ended) = {
              let mut st = st.lock();
              st.b.push_back(v);
              let pair = if !st.a.is_empty() && !st.b.is_empty() {
                Some((st.a.pop_front(), st.b.pop_front()))
              } else {
                None
              };
              (pair, st.exhausted())
            };
            if let Some((Some(a), Some(b))) = pair {
              s.next((*f)(a, b));
            }
            if ended {
              s.complete();
              rival.sever();
            }
          }
          Event::Error(e) => {
            s.error(e);
            rival.sever();
          }
          Event::Completed => {
            let ended = {
              let mut st = st.lock();
              st.b_done = true;
              st.exhausted()
            };
            if ended {
              s.complete();
              rival.sever();
            }
          }
        }));
      }

      group.into_disposable()
    })
  }
}
