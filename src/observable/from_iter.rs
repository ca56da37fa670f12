//! Iterator-backed sources.

use crate::{disposable::Disposable, observable::Observable, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Replays the iterator once per subscription, then completes.
  ///
  /// Emission stops early if the subscriber disposes mid-iteration.
  pub fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
  {
    Observable::create(move |sink: Sink<T>| {
      for value in iter.clone() {
        if !sink.is_active() {
          break;
        }
        sink.next(value);
      }
      sink.complete();
      Disposable::empty()
    })
  }
}

impl Observable<i32> {
  /// Emits `count` consecutive integers starting at `start`, then completes.
  pub fn range(start: i32, count: u32) -> Self {
    Observable::from_iter(start..start.wrapping_add(count as i32))
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn from_iter_replays_per_subscription() {
    let source = Observable::from_iter(vec![1, 2, 3]);
    for _ in 0..2 {
      let seen = Arc::new(Mutex::new(Vec::new()));
      let log = seen.clone();
      source.subscribe(move |v| log.lock().unwrap().push(v));
      assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }
  }

  #[test]
  fn range_counts_from_start() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    Observable::range(5, 3).subscribe(move |v| log.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![5, 6, 7]);
  }

  #[test]
  fn disposal_stops_iteration() {
    // take() disposes its upstream after the second element, which must cut
    // the iteration loop short rather than drain the whole range.
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    Observable::range(0, 1_000)
      .take(2)
      .subscribe(move |v| log.lock().unwrap().push(v));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1]);
  }
}
