//! Delivery-context hopping.

use crate::{
  disposable::CompositeDisposable,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Moves delivery of every event onto `scheduler`, independent of where
  /// it was produced. Relative order is preserved on any serial scheduler.
  pub fn observe_on(&self, scheduler: SchedulerRef) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      let hops = CompositeDisposable::new();

      let scheduler = scheduler.clone();
      let pending = hops.clone();
      group.add(source.subscribe_event(move |event| {
        let sink = sink.clone();
        pending.add(scheduler.schedule(None, Box::new(move || sink.forward(event))));
      }));
      group.add(hops.into_disposable());
      group.into_disposable()
    })
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex as StdMutex};

  use super::*;
  use crate::scheduler::MainScheduler;

  #[test]
  fn delivery_waits_for_the_target_scheduler() {
    let main = MainScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    Observable::from_iter(vec![1, 2, 3])
      .observe_on(Arc::new(main.clone()))
      .subscribe(move |v| log.lock().unwrap().push(v));

    // Produced synchronously, but nothing is delivered until the pump runs.
    assert!(seen.lock().unwrap().is_empty());
    main.run_pending();
    assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
  }

  #[test]
  fn disposal_drops_scheduled_deliveries() {
    let main = MainScheduler::new();
    let seen = Arc::new(StdMutex::new(Vec::new()));
    let log = seen.clone();
    let sub = Observable::from_iter(vec![1, 2, 3])
      .observe_on(Arc::new(main.clone()))
      .subscribe(move |v: i32| log.lock().unwrap().push(v));

    sub.dispose();
    main.run_pending();
    assert!(seen.lock().unwrap().is_empty());
  }
}
