//! Prefix-taking operators.

use std::sync::Arc;

use crate::{
  disposable::{CompositeDisposable, Disposable},
  event::Event,
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Forwards the first `count` elements, then completes and severs the
  /// source.
  pub fn take(&self, count: usize) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      if count == 0 {
        sink.complete();
        return Disposable::empty();
      }
      let upstream = Upstream::new();
      let cut = upstream.clone();
      let mut remaining = count;
      upstream.connect(&source, move |event: Event<T>| match event {
        Event::Next(v) => {
          if remaining == 0 {
            return;
          }
          remaining -= 1;
          sink.next(v);
          if remaining == 0 {
            sink.complete();
            cut.sever();
          }
        }
        other => sink.forward(other),
      })
    })
  }

  /// Forwards elements while `pred` holds; completes at the first failing
  /// element, which is not forwarded.
  pub fn take_while(&self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Observable<T> {
    let source = self.clone();
    let pred = Arc::new(pred);
    Observable::create(move |sink: Sink<T>| {
      let pred = pred.clone();
      let upstream = Upstream::new();
      let cut = upstream.clone();
      upstream.connect(&source, move |event: Event<T>| match event {
        Event::Next(v) => {
          if (*pred)(&v) {
            sink.next(v);
          } else {
            sink.complete();
            cut.sever();
          }
        }
        other => sink.forward(other),
      })
    })
  }

  /// Mirrors the source until `trigger` emits anything, then completes
  /// immediately. The trigger's own completion is ignored.
  pub fn take_until<U: Send + 'static>(&self, trigger: Observable<U>) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      let upstream = Upstream::new();
      let trigger_handle = Upstream::<U>::new();

      // The trigger is wired first so a subscribe-time emission stops the
      // source before it produces anything.
      let s = sink.clone();
      let cut_source = upstream.clone();
      let cut_trigger = trigger_handle.clone();
      group.add(trigger_handle.connect(&trigger, move |event: Event<U>| match event {
        Event::Next(_) => {
          s.complete();
          cut_source.sever();
          cut_trigger.sever();
        }
        Event::Error(e) => {
          s.error(e);
          cut_source.sever();
        }
        Event::Completed => {}
      }));

      if sink.is_active() {
        let s = sink.clone();
        let cut_trigger = trigger_handle.clone();
        group.add(upstream.connect(&source, move |event: Event<T>| match event {
          Event::Next(v) => s.next(v),
          other => {
            s.forward(other);
            cut_trigger.sever();
          }
        }));
      }
      group.into_disposable()
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::subject::PublishSubject;

  #[test]
  fn take_completes_after_count() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    Observable::range(0, 100).take(3).subscribe_all(
      move |v| log.lock().unwrap().push(v),
      |_| {},
      move || *flag.lock().unwrap() = true,
    );
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn take_while_stops_at_first_failure() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    Observable::from_iter(vec![2, 4, 5, 6])
      .take_while(|v| v % 2 == 0)
      .subscribe(move |v| log.lock().unwrap().push(v));
    // 5 fails the predicate and is not forwarded; 6 is never seen even
    // though it would pass again.
    assert_eq!(*seen.lock().unwrap(), vec![2, 4]);
  }

  #[test]
  fn take_until_completes_the_moment_the_trigger_fires() {
    let source = PublishSubject::new();
    let trigger = PublishSubject::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    source
      .as_observable()
      .take_until(trigger.as_observable())
      .subscribe_all(
        move |v| log.lock().unwrap().push(v),
        |_| {},
        move || *flag.lock().unwrap() = true,
      );

    source.next(1);
    source.next(2);
    trigger.next(());
    source.next(3);

    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
    assert!(*done.lock().unwrap());
  }

  #[test]
  fn take_until_ignores_trigger_completion() {
    let source = PublishSubject::new();
    let trigger = PublishSubject::<()>::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    source
      .as_observable()
      .take_until(trigger.as_observable())
      .subscribe(move |v| log.lock().unwrap().push(v));

    source.next(1);
    trigger.complete();
    source.next(2);
    assert_eq!(*seen.lock().unwrap(), vec![1, 2]);
  }
}
