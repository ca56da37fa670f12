//! Prefix-dropping operators.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Drops the first `count` elements, forwards the rest.
  pub fn skip(&self, count: usize) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let mut remaining = count;
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          if remaining > 0 {
            remaining -= 1;
          } else {
            sink.next(v);
          }
        }
        other => sink.forward(other),
      })
    })
  }

  /// Drops elements while `pred` holds; from the first failing element on,
  /// everything is forwarded, even if the predicate would hold again.
  pub fn skip_while(&self, pred: impl Fn(&T) -> bool + Send + Sync + 'static) -> Observable<T> {
    let source = self.clone();
    let pred = Arc::new(pred);
    Observable::create(move |sink: Sink<T>| {
      let pred = pred.clone();
      let mut skipping = true;
      source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          if skipping && (*pred)(&v) {
            return;
          }
          skipping = false;
          sink.next(v);
        }
        other => sink.forward(other),
      })
    })
  }

  /// Drops everything until `trigger` emits once; the trigger is severed
  /// after its first emission.
  pub fn skip_until<U: Send + 'static>(&self, trigger: Observable<U>) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      let open = Arc::new(AtomicBool::new(false));

      let trigger_handle = Upstream::<U>::new();
      let cut_trigger = trigger_handle.clone();
      let gate = open.clone();
      let s = sink.clone();
      group.add(trigger_handle.connect(&trigger, move |event: Event<U>| match event {
        Event::Next(_) => {
          gate.store(true, Ordering::Release);
          cut_trigger.sever();
        }
        Event::Error(e) => s.error(e),
        Event::Completed => {}
      }));

      group.add(source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          if open.load(Ordering::Acquire) {
            sink.next(v);
          }
        }
        other => sink.forward(other),
      }));
      group.into_disposable()
    })
  }
}
