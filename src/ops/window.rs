//! Time- and count-bounded windowing.

use std::{sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
  disposable::{CompositeDisposable, SerialDisposable},
  event::Event,
  observable::Observable,
  scheduler::SchedulerRef,
  sink::Sink,
  subject::PublishSubject,
};

struct WindowState<T> {
  current: PublishSubject<T>,
  filled: usize,
}

impl<T: Clone + Send + 'static> Observable<T> {
  /// Like `buffer`, but each window is emitted as its own inner observable
  /// the moment it opens; a flush completes the current window and opens
  /// the next one.
  pub fn window(
    &self,
    time_span: Duration,
    count: usize,
    scheduler: SchedulerRef,
  ) -> Observable<Observable<T>> {
    let source = self.clone();
    Observable::create(move |sink: Sink<Observable<T>>| {
      let first = PublishSubject::new();
      sink.next(first.as_observable());
      let state = Arc::new(Mutex::new(WindowState { current: first, filled: 0 }));
      let timer = SerialDisposable::new();
      let group = CompositeDisposable::new();

      arm(scheduler.clone(), time_span, state.clone(), sink.clone(), timer.clone());

      let flush_scheduler = scheduler.clone();
      let slot = timer.clone();
      let windows = state.clone();
      group.add(source.subscribe_event(move |event| match event {
        Event::Next(v) => {
          // Delivery happens outside the state lock so a window consumer
          // can feed back into the pipeline without deadlocking.
          let (window, full) = {
            let mut state = windows.lock();
            state.filled += 1;
            (state.current.clone(), state.filled >= count)
          };
          window.next(v);
          if full {
            rotate(&windows, &sink);
            arm(flush_scheduler.clone(), time_span, windows.clone(), sink.clone(), slot.clone());
          }
        }
        Event::Error(e) => {
          let window = windows.lock().current.clone();
          window.error(e.clone());
          sink.error(e);
        }
        Event::Completed => {
          let window = windows.lock().current.clone();
          window.complete();
          sink.complete();
        }
      }));
      group.add(timer.into_disposable());
      group.into_disposable()
    })
  }
}

/// Completes the open window and, while downstream is live, opens the next.
fn rotate<T: Clone + Send + 'static>(
  state: &Arc<Mutex<WindowState<T>>>,
  sink: &Sink<Observable<T>>,
) {
  let (closing, next) = {
    let mut state = state.lock();
    let next = PublishSubject::new();
    let closing = std::mem::replace(&mut state.current, next.clone());
    state.filled = 0;
    (closing, next)
  };
  closing.complete();
  if sink.is_active() {
    sink.next(next.as_observable());
  }
}

fn arm<T: Clone + Send + 'static>(
  scheduler: SchedulerRef,
  time_span: Duration,
  state: Arc<Mutex<WindowState<T>>>,
  sink: Sink<Observable<T>>,
  timer: SerialDisposable,
) {
  let next_scheduler = scheduler.clone();
  let next_timer = timer.clone();
  let handle = scheduler.schedule(
    Some(time_span),
    Box::new(move || {
      rotate(&state, &sink);
      if sink.is_active() {
        arm(next_scheduler, time_span, state, sink, next_timer);
      }
    }),
  );
  timer.replace(handle);
}
