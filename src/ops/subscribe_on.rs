//! Subscription-context hopping.

use crate::{observable::Observable, scheduler::SchedulerRef, sink::Sink};

impl<T: Send + 'static> Observable<T> {
  /// Runs the act of subscribing (the source factory) on `scheduler`.
  /// Where events are delivered is unchanged; pair with `observe_on` to
  /// control both ends of a pipeline.
  pub fn subscribe_on(&self, scheduler: SchedulerRef) -> Observable<T> {
    let source = self.clone();
    Observable::create(move |sink: Sink<T>| {
      let source = source.clone();
      scheduler.schedule(
        None,
        Box::new(move || {
          if sink.is_active() {
            let teardown = source.raw_subscribe(sink.clone());
            sink.attach(teardown);
          }
        }),
      )
    })
  }
}
