//! Background serial worker scheduler.

use std::{
  collections::BinaryHeap,
  sync::Arc,
  time::{Duration, Instant},
};

use parking_lot::{Condvar, Mutex};
use tracing::debug;

use crate::{
  disposable::Disposable,
  scheduler::{QueuedTask, Scheduler, Task},
};

/// A single worker thread draining a delay-ordered queue.
///
/// Tasks with the same deadline run in submission order, which is what
/// makes `observe_on` order-preserving on this scheduler. The worker exits
/// once the last handle is dropped; tasks still pending at that point are
/// discarded, matching disposal semantics for work nobody can observe.
#[derive(Clone)]
pub struct SerialScheduler {
  core: Arc<QueueCore>,
  _guard: Arc<ShutdownGuard>,
}

struct QueueCore {
  state: Mutex<QueueState>,
  signal: Condvar,
}

struct QueueState {
  heap: BinaryHeap<QueuedTask<Instant>>,
  seq: u64,
  shutdown: bool,
}

struct ShutdownGuard {
  core: Arc<QueueCore>,
}

impl Drop for ShutdownGuard {
  fn drop(&mut self) {
    self.core.state.lock().shutdown = true;
    self.core.signal.notify_one();
  }
}

impl SerialScheduler {
  pub fn new(label: &str) -> Self {
    let core = Arc::new(QueueCore {
      state: Mutex::new(QueueState { heap: BinaryHeap::new(), seq: 0, shutdown: false }),
      signal: Condvar::new(),
    });
    let worker_core = core.clone();
    let name = format!("rivulet-{label}");
    std::thread::Builder::new()
      .name(name.clone())
      .spawn(move || worker_loop(worker_core))
      .expect("failed to spawn scheduler worker");
    debug!(worker = %name, "serial scheduler started");
    SerialScheduler { core: core.clone(), _guard: Arc::new(ShutdownGuard { core }) }
  }
}

impl Scheduler for SerialScheduler {
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable {
    let due = Instant::now() + delay.unwrap_or_default();
    let handle = {
      let mut state = self.core.state.lock();
      state.seq += 1;
      let entry = QueuedTask::new(due, state.seq, task);
      let handle = entry.cancel_handle();
      state.heap.push(entry);
      handle
    };
    self.core.signal.notify_one();
    handle
  }
}

fn worker_loop(core: Arc<QueueCore>) {
  let mut state = core.state.lock();
  loop {
    if state.shutdown {
      break;
    }
    let now = Instant::now();
    if let Some(top) = state.heap.peek() {
      if top.due <= now {
        let entry = state.heap.pop().expect("peeked entry vanished");
        drop(state);
        entry.run_if_live();
        state = core.state.lock();
        continue;
      }
      let deadline = top.due;
      core.signal.wait_until(&mut state, deadline);
    } else {
      core.signal.wait(&mut state);
    }
  }
  debug!("serial scheduler stopped");
}

#[cfg(test)]
mod test {
  use std::sync::{
    mpsc::channel,
    Arc, Mutex,
  };

  use super::*;

  #[test]
  fn runs_tasks_in_submission_order() {
    let scheduler = SerialScheduler::new("test-order");
    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = channel();
    for i in 0..4 {
      let log = log.clone();
      let tx = tx.clone();
      scheduler.schedule(
        None,
        Box::new(move || {
          log.lock().unwrap().push(i);
          tx.send(()).unwrap();
        }),
      );
    }
    for _ in 0..4 {
      rx.recv_timeout(Duration::from_secs(1)).unwrap();
    }
    assert_eq!(*log.lock().unwrap(), vec![0, 1, 2, 3]);
  }

  #[test]
  fn delayed_task_fires_after_earlier_one() {
    let scheduler = SerialScheduler::new("test-delay");
    let log = Arc::new(Mutex::new(Vec::new()));
    let (tx, rx) = channel();

    let l = log.clone();
    let t = tx.clone();
    scheduler.schedule(
      Some(Duration::from_millis(40)),
      Box::new(move || {
        l.lock().unwrap().push("late");
        t.send(()).unwrap();
      }),
    );
    let l = log.clone();
    scheduler.schedule(
      None,
      Box::new(move || {
        l.lock().unwrap().push("early");
        tx.send(()).unwrap();
      }),
    );

    for _ in 0..2 {
      rx.recv_timeout(Duration::from_secs(1)).unwrap();
    }
    assert_eq!(*log.lock().unwrap(), vec!["early", "late"]);
  }

  #[test]
  fn cancelled_task_never_runs() {
    let scheduler = SerialScheduler::new("test-cancel");
    let (tx, rx) = channel();
    let handle = scheduler.schedule(
      Some(Duration::from_millis(20)),
      Box::new(|| panic!("cancelled task ran")),
    );
    handle.dispose();
    scheduler.schedule(
      Some(Duration::from_millis(40)),
      Box::new(move || tx.send(()).unwrap()),
    );
    rx.recv_timeout(Duration::from_secs(1)).unwrap();
  }
}
