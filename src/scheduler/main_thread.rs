//! Main-thread-affine scheduler.

use std::{
  collections::BinaryHeap,
  sync::Arc,
  time::{Duration, Instant},
};

use parking_lot::Mutex;

use crate::{
  disposable::Disposable,
  scheduler::{QueuedTask, Scheduler, Task},
};

/// A queue any thread may post to, drained only when the owning thread
/// calls [`run_pending`](MainScheduler::run_pending).
///
/// Embedders with a UI or game loop pump this once per frame; tasks whose
/// deadline has not arrived stay queued for a later pump.
#[derive(Clone, Default)]
pub struct MainScheduler {
  state: Arc<Mutex<QueueState>>,
}

#[derive(Default)]
struct QueueState {
  heap: BinaryHeap<QueuedTask<Instant>>,
  seq: u64,
}

impl MainScheduler {
  pub fn new() -> Self { Self::default() }

  /// Runs every queued task whose deadline has passed, in deadline order,
  /// FIFO within a deadline. Returns the number of tasks run. Tasks posted
  /// by a running task with no delay run within the same pump.
  pub fn run_pending(&self) -> usize {
    let mut ran = 0;
    loop {
      let entry = {
        let mut state = self.state.lock();
        match state.heap.peek() {
          Some(top) if top.due <= Instant::now() => state.heap.pop(),
          _ => None,
        }
      };
      match entry {
        Some(entry) => {
          entry.run_if_live();
          ran += 1;
        }
        None => return ran,
      }
    }
  }
}

impl Scheduler for MainScheduler {
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable {
    let due = Instant::now() + delay.unwrap_or_default();
    let mut state = self.state.lock();
    state.seq += 1;
    let entry = QueuedTask::new(due, state.seq, task);
    let handle = entry.cancel_handle();
    state.heap.push(entry);
    handle
  }
}
