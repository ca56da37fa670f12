//! Running and final accumulation.

use std::sync::Arc;

use crate::{event::Event, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Emits every intermediate accumulation, starting from the first
  /// element folded into `seed`.
  pub fn scan<A, F>(&self, seed: A, f: F) -> Observable<A>
  where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, T) -> A + Send + Sync + 'static,
  {
    let source = self.clone();
    let f = Arc::new(f);
    Observable::create(move |sink: Sink<A>| {
      let f = f.clone();
      let mut acc = seed.clone();
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          acc = (*f)(acc.clone(), v);
          sink.next(acc.clone());
        }
        other => sink.forward(other.retag()),
      })
    })
  }

  /// Emits only the final accumulation, when the upstream completes.
  pub fn reduce<A, F>(&self, seed: A, f: F) -> Observable<A>
  where
    A: Clone + Send + Sync + 'static,
    F: Fn(A, T) -> A + Send + Sync + 'static,
  {
    let source = self.clone();
    let f = Arc::new(f);
    Observable::create(move |sink: Sink<A>| {
      let f = f.clone();
      let mut acc = Some(seed.clone());
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          if let Some(a) = acc.take() {
            acc = Some((*f)(a, v));
          }
        }
        Event::Error(e) => sink.error(e),
        Event::Completed => {
          if let Some(a) = acc.take() {
            sink.next(a);
          }
          sink.complete();
        }
      })
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn scan_emits_every_intermediate_sum() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    Observable::from_iter(vec![1, 2, 3, 4])
      .scan(0, |acc, v| acc + v)
      .subscribe(move |v| log.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![1, 3, 6, 10]);
  }

  #[test]
  fn reduce_emits_only_the_final_sum_on_completion() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    Observable::from_iter(vec![1, 2, 3, 4])
      .reduce(0, |acc, v| acc + v)
      .subscribe_all(
        move |v| log.lock().unwrap().push(v),
        |_| {},
        move || *flag.lock().unwrap() = true,
      );
    assert_eq!(*seen.lock().unwrap(), vec![10]);
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn reduce_on_empty_emits_the_seed() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    Observable::<i32>::empty()
      .reduce(42, |acc, v| acc + v)
      .subscribe(move |v| log.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![42]);
  }
}
