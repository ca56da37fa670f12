//! One-stop import for pipeline code.

pub use crate::{
  disposable::{CompositeDisposable, Disposable, ScopedDisposable, SerialDisposable},
  event::{Event, StreamError},
  observable::Observable,
  observer::{Callbacks, Observer},
  ops::Connectable,
  scheduler::{
    self, ImmediateScheduler, MainScheduler, Scheduler, SchedulerRef, SerialScheduler,
    VirtualScheduler,
  },
  sink::Sink,
  subject::{BehaviorSubject, PublishSubject, ReplaySubject, Variable},
};

#[cfg(feature = "pool-scheduler")]
pub use crate::scheduler::PoolScheduler;
