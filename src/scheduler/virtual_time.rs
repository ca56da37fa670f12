//! Virtual-time scheduler for deterministic tests.

use std::{collections::BinaryHeap, sync::Arc, time::Duration};

use parking_lot::Mutex;

use crate::{
  disposable::Disposable,
  scheduler::{QueuedTask, Scheduler, Task},
};

/// A scheduler whose clock only moves when the test advances it.
///
/// Tasks are ordered by virtual deadline and run synchronously inside
/// [`advance_by`](VirtualScheduler::advance_by); a task that schedules
/// further work within the advanced window runs in the same call. Real
/// wall-clock time never passes.
#[derive(Clone, Default)]
pub struct VirtualScheduler {
  state: Arc<Mutex<ClockState>>,
}

#[derive(Default)]
struct ClockState {
  now: Duration,
  heap: BinaryHeap<QueuedTask<Duration>>,
  seq: u64,
}

impl VirtualScheduler {
  pub fn new() -> Self { Self::default() }

  /// Current virtual time.
  pub fn now(&self) -> Duration { self.state.lock().now }

  /// Moves the clock forward by `step`, running every task due on the way.
  pub fn advance_by(&self, step: Duration) {
    let target = self.state.lock().now + step;
    self.advance_to(target);
  }

  /// Moves the clock to `target`, running every task due on the way. The
  /// clock is set to each task's own deadline before the task runs, so a
  /// task rescheduling itself sees a consistent `now`.
  pub fn advance_to(&self, target: Duration) {
    loop {
      let entry = {
        let mut state = self.state.lock();
        match state.heap.peek() {
          Some(top) if top.due <= target => {
            let entry = state.heap.pop().expect("peeked entry vanished");
            state.now = state.now.max(entry.due);
            Some(entry)
          }
          _ => {
            state.now = state.now.max(target);
            None
          }
        }
      };
      match entry {
        Some(entry) => entry.run_if_live(),
        None => return,
      }
    }
  }
}

impl Scheduler for VirtualScheduler {
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable {
    let mut state = self.state.lock();
    let due = state.now + delay.unwrap_or_default();
    state.seq += 1;
    let entry = QueuedTask::new(due, state.seq, task);
    let handle = entry.cancel_handle();
    state.heap.push(entry);
    handle
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn clock_starts_at_zero_and_only_moves_on_advance() {
    let scheduler = VirtualScheduler::new();
    assert_eq!(scheduler.now(), Duration::ZERO);
    scheduler.advance_by(Duration::from_secs(3));
    assert_eq!(scheduler.now(), Duration::from_secs(3));
  }

  #[test]
  fn tasks_run_at_their_virtual_deadline() {
    let scheduler = VirtualScheduler::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    for (label, at) in [("a", 5), ("b", 2), ("c", 9)] {
      let log = log.clone();
      scheduler.schedule(
        Some(Duration::from_secs(at)),
        Box::new(move || log.lock().unwrap().push(label)),
      );
    }
    scheduler.advance_by(Duration::from_secs(6));
    assert_eq!(*log.lock().unwrap(), vec!["b", "a"]);
    scheduler.advance_by(Duration::from_secs(6));
    assert_eq!(*log.lock().unwrap(), vec!["b", "a", "c"]);
  }

  #[test]
  fn rescheduling_task_runs_repeatedly_within_one_advance() {
    let scheduler = VirtualScheduler::new();
    let ticks = Arc::new(Mutex::new(Vec::new()));

    fn arm(scheduler: &VirtualScheduler, ticks: Arc<Mutex<Vec<Duration>>>) {
      let again = scheduler.clone();
      scheduler.schedule(
        Some(Duration::from_secs(1)),
        Box::new(move || {
          ticks.lock().unwrap().push(again.now());
          arm(&again, ticks);
        }),
      );
    }
    arm(&scheduler, ticks.clone());

    scheduler.advance_by(Duration::from_secs(3));
    let seen = ticks.lock().unwrap().clone();
    assert_eq!(
      seen,
      vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(3)]
    );
  }

  #[test]
  fn cancelled_task_is_skipped() {
    let scheduler = VirtualScheduler::new();
    let handle =
      scheduler.schedule(Some(Duration::from_secs(1)), Box::new(|| panic!("cancelled task ran")));
    handle.dispose();
    scheduler.advance_by(Duration::from_secs(2));
  }
}
