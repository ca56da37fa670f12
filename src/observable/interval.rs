//! Timer-driven sources.

use std::time::Duration;

use crate::{
  disposable::SerialDisposable,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl Observable<u64> {
  /// Emits an increasing counter every `period` on `scheduler`, never
  /// completing on its own. Each subscription gets its own timer.
  pub fn interval(period: Duration, scheduler: SchedulerRef) -> Self {
    Observable::create(move |sink: Sink<u64>| {
      let slot = SerialDisposable::new();
      arm(sink, scheduler.clone(), period, 0, slot.clone());
      slot.into_disposable()
    })
  }

  /// Emits a single `0` after `delay`, then completes.
  pub fn timer(delay: Duration, scheduler: SchedulerRef) -> Self {
    Observable::create(move |sink: Sink<u64>| {
      scheduler.schedule(
        Some(delay),
        Box::new(move || {
          sink.next(0);
          sink.complete();
        }),
      )
    })
  }
}

fn arm(
  sink: Sink<u64>,
  scheduler: SchedulerRef,
  period: Duration,
  count: u64,
  slot: SerialDisposable,
) {
  let next_scheduler = scheduler.clone();
  let next_slot = slot.clone();
  let handle = scheduler.schedule(
    Some(period),
    Box::new(move || {
      sink.next(count);
      if sink.is_active() {
        arm(sink, next_scheduler, period, count + 1, next_slot);
      }
    }),
  );
  slot.replace(handle);
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;
  use crate::scheduler::VirtualScheduler;

  #[test]
  fn interval_ticks_on_virtual_time() {
    let clock = VirtualScheduler::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();
    let sub = Observable::interval(Duration::from_secs(1), Arc::new(clock.clone()))
      .subscribe(move |v| log.lock().unwrap().push(v));

    clock.advance_by(Duration::from_secs(3));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);

    sub.dispose();
    clock.advance_by(Duration::from_secs(3));
    assert_eq!(*seen.lock().unwrap(), vec![0, 1, 2]);
  }

  #[test]
  fn timer_fires_once_then_completes() {
    let clock = VirtualScheduler::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let done = Arc::new(Mutex::new(false));
    let log = seen.clone();
    let flag = done.clone();
    Observable::timer(Duration::from_secs(2), Arc::new(clock.clone())).subscribe_all(
      move |v| log.lock().unwrap().push(v),
      |_| {},
      move || *flag.lock().unwrap() = true,
    );

    clock.advance_by(Duration::from_secs(1));
    assert!(seen.lock().unwrap().is_empty());
    clock.advance_by(Duration::from_secs(1));
    assert_eq!(*seen.lock().unwrap(), vec![0]);
    assert!(*done.lock().unwrap());
  }
}
