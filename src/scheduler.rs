//! Execution-context abstraction for where and when work runs.
//!
//! The engine itself never spawns threads behind an operator's back:
//! concurrency enters a pipeline only through `subscribe_on`/`observe_on`
//! boundaries and through time-based operators, all of which take an
//! injected [`SchedulerRef`]. The crate ships:
//!
//! - [`ImmediateScheduler`] — runs inline in the calling context;
//! - [`SerialScheduler`] — one background worker draining a delay-ordered
//!   queue in FIFO order for equal deadlines;
//! - [`PoolScheduler`] — fans work out onto a `futures` thread pool
//!   (`pool-scheduler` feature);
//! - [`MainScheduler`] — a main/UI-affine queue pumped explicitly by its
//!   owning thread;
//! - [`VirtualScheduler`] — virtual time for deterministic tests.

use std::{
  cmp::Ordering as CmpOrdering,
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  time::Duration,
};

use once_cell::sync::Lazy;

use crate::disposable::Disposable;

mod immediate;
mod main_thread;
#[cfg(feature = "pool-scheduler")]
mod pool;
mod serial;
mod virtual_time;

pub use immediate::ImmediateScheduler;
pub use main_thread::MainScheduler;
#[cfg(feature = "pool-scheduler")]
pub use pool::PoolScheduler;
pub use serial::SerialScheduler;
pub use virtual_time::VirtualScheduler;

/// A unit of work handed to a scheduler.
pub type Task = Box<dyn FnOnce() + Send>;

/// Orders tasks and decides where and when they execute.
pub trait Scheduler: Send + Sync {
  /// Runs `task` after the optional delay. The returned disposable cancels
  /// the task if it has not started yet; it cannot interrupt a running one.
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable;
}

/// Shared scheduler handle, the form operators accept.
pub type SchedulerRef = Arc<dyn Scheduler>;

/// The process-wide inline scheduler.
pub fn immediate() -> SchedulerRef {
  static INSTANCE: Lazy<Arc<ImmediateScheduler>> = Lazy::new(|| Arc::new(ImmediateScheduler));
  INSTANCE.clone() as SchedulerRef
}

/// The process-wide background serial worker.
pub fn background() -> SchedulerRef {
  static INSTANCE: Lazy<Arc<SerialScheduler>> =
    Lazy::new(|| Arc::new(SerialScheduler::new("background")));
  INSTANCE.clone() as SchedulerRef
}

/// Shared timer worker used to realize delays for schedulers that have no
/// native timing facility of their own.
#[cfg(feature = "pool-scheduler")]
pub(crate) fn timer_worker() -> &'static SerialScheduler {
  static INSTANCE: Lazy<SerialScheduler> = Lazy::new(|| SerialScheduler::new("timer"));
  &INSTANCE
}

/// Heap entry shared by the queue-based schedulers. Ordered so that a
/// `BinaryHeap` pops the earliest deadline first, FIFO within a deadline.
pub(crate) struct QueuedTask<K> {
  pub due: K,
  pub seq: u64,
  pub cancelled: Arc<AtomicBool>,
  pub task: Option<Task>,
}

impl<K: Ord> QueuedTask<K> {
  pub fn new(due: K, seq: u64, task: Task) -> Self {
    QueuedTask { due, seq, cancelled: Arc::new(AtomicBool::new(false)), task: Some(task) }
  }

  /// Cancel handle for this entry; the entry is skipped when popped.
  pub fn cancel_handle(&self) -> Disposable {
    let cancelled = self.cancelled.clone();
    Disposable::new(move || cancelled.store(true, Ordering::Release))
  }

  /// Runs the task unless the entry was cancelled.
  pub fn run_if_live(mut self) {
    if !self.cancelled.load(Ordering::Acquire) {
      if let Some(task) = self.task.take() {
        task();
      }
    }
  }
}

impl<K: Ord> PartialEq for QueuedTask<K> {
  fn eq(&self, other: &Self) -> bool { self.due == other.due && self.seq == other.seq }
}

impl<K: Ord> Eq for QueuedTask<K> {}

impl<K: Ord> PartialOrd for QueuedTask<K> {
  fn partial_cmp(&self, other: &Self) -> Option<CmpOrdering> { Some(self.cmp(other)) }
}

impl<K: Ord> Ord for QueuedTask<K> {
  fn cmp(&self, other: &Self) -> CmpOrdering {
    // Reversed: BinaryHeap is a max-heap, we want the earliest entry on top.
    other
      .due
      .cmp(&self.due)
      .then(other.seq.cmp(&self.seq))
  }
}
