//! Inter-element deadline enforcement.

use std::time::Duration;

use crate::{
  disposable::{CompositeDisposable, SerialDisposable},
  event::{Event, StreamError},
  observable::Observable,
  ops::Upstream,
  scheduler::SchedulerRef,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Errors with [`StreamError::Timeout`] if no element arrives within
  /// `duration` of subscription or of the previous element.
  pub fn timeout(&self, duration: Duration, scheduler: SchedulerRef) -> Observable<T> {
    self.timeout_impl(duration, None, scheduler)
  }

  /// Like [`timeout`](Observable::timeout), but switches to `fallback`
  /// instead of erroring when the deadline passes.
  pub fn timeout_with(
    &self,
    duration: Duration,
    fallback: Observable<T>,
    scheduler: SchedulerRef,
  ) -> Observable<T> {
    self.timeout_impl(duration, Some(fallback), scheduler)
  }

  fn timeout_impl(
    &self,
    duration: Duration,
    fallback: Option<Observable<T>>,
    scheduler: SchedulerRef,
  ) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let upstream = Upstream::new();
      let timer = SerialDisposable::new();
      let group = CompositeDisposable::new();

      let deadline = {
        let cut = upstream.clone();
        let fallback = fallback.clone();
        let sink = sink.clone();
        move || {
          cut.sever();
          match &fallback {
            Some(fallback) => {
              let teardown = fallback.raw_subscribe(sink.clone());
              sink.attach(teardown);
            }
            None => sink.error(StreamError::Timeout(duration)),
          }
        }
      };

      timer.replace(scheduler.schedule(Some(duration), Box::new(deadline.clone())));

      let slot = timer.clone();
      let arm_scheduler = scheduler.clone();
      group.add(upstream.connect(&source, move |event: Event<T>| match event {
        Event::Next(v) => {
          sink.next(v);
          if sink.is_active() {
            slot.replace(arm_scheduler.schedule(Some(duration), Box::new(deadline.clone())));
          }
        }
        other => {
          slot.dispose();
          sink.forward(other);
        }
      }));
      group.add(timer.into_disposable());
      group.into_disposable()
    })
  }
}
