//! Time- and count-bounded batching.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
  disposable::{CompositeDisposable, SerialDisposable},
  event::Event,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Collects elements into batches, flushing whenever `count` elements
  /// accumulate or `time_span` elapses since the last flush, whichever
  /// comes first. Time flushes may emit empty batches; a count flush resets
  /// the timer. On completion the final batch is emitted before the
  /// terminal event.
  pub fn buffer(
    &self,
    time_span: Duration,
    count: usize,
    scheduler: SchedulerRef,
  ) -> Observable<Vec<T>> {
    let source = self.clone();
    Observable::create(move |sink: Sink<Vec<T>>| {
      let pending = Arc::new(Mutex::new(Vec::new()));
      let timer = SerialDisposable::new();
      let group = CompositeDisposable::new();

      arm(scheduler.clone(), time_span, pending.clone(), sink.clone(), timer.clone());

      let flush_scheduler = scheduler.clone();
      let slot = timer.clone();
      let batches = pending.clone();
      group.add(source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          let full = {
            let mut pending = batches.lock();
            pending.push(v);
            pending.len() >= count
          };
          if full {
            sink.next(std::mem::take(&mut *batches.lock()));
            arm(flush_scheduler.clone(), time_span, batches.clone(), sink.clone(), slot.clone());
          }
        }
        Event::Error(e) => sink.error(e),
        Event::Completed => {
          sink.next(std::mem::take(&mut *batches.lock()));
          sink.complete();
        }
      }));
      group.add(timer.into_disposable());
      group.into_disposable()
    })
  }
}

fn arm<T: Send + 'static>(
  scheduler: SchedulerRef,
  time_span: Duration,
  pending: Arc<Mutex<Vec<T>>>,
  sink: Sink<Vec<T>>,
  timer: SerialDisposable,
) {
  let next_scheduler = scheduler.clone();
  let next_timer = timer.clone();
  let handle = scheduler.schedule(
    Some(time_span),
    Box::new(move || {
      sink.next(std::mem::take(&mut *pending.lock()));
      if sink.is_active() {
        arm(next_scheduler, time_span, pending, sink, next_timer);
      }
    }),
  );
  timer.replace(handle);
}
