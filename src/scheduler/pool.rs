//! Thread-pool scheduler backed by `futures`.

use std::{
  sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
  },
  time::Duration,
};

use futures::executor::ThreadPool;
use once_cell::sync::Lazy;

use crate::{
  disposable::Disposable,
  scheduler::{timer_worker, Scheduler, Task},
};

/// Fans tasks out onto a shared `futures` thread pool.
///
/// Order across tasks is not guaranteed; pipelines that need serialized
/// delivery pair this with `observe_on` onto a [`SerialScheduler`]
/// downstream. Delayed tasks wait on the shared timer worker and hop onto
/// the pool when due.
///
/// [`SerialScheduler`]: crate::scheduler::SerialScheduler
#[derive(Clone)]
pub struct PoolScheduler {
  pool: ThreadPool,
}

static SHARED_POOL: Lazy<ThreadPool> = Lazy::new(|| {
  ThreadPool::builder()
    .name_prefix("rivulet-pool-")
    .create()
    .expect("failed to build thread pool")
});

impl Default for PoolScheduler {
  fn default() -> Self { PoolScheduler { pool: SHARED_POOL.clone() } }
}

impl PoolScheduler {
  pub fn new() -> Self { Self::default() }

  fn spawn(&self, task: Task, cancelled: Arc<AtomicBool>) {
    self.pool.spawn_ok(async move {
      if !cancelled.load(Ordering::Acquire) {
        task();
      }
    });
  }
}

impl Scheduler for PoolScheduler {
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable {
    let cancelled = Arc::new(AtomicBool::new(false));
    let flag = cancelled.clone();
    let handle = Disposable::new(move || flag.store(true, Ordering::Release));

    match delay {
      Some(delay) if !delay.is_zero() => {
        let pool = self.clone();
        let flag = cancelled.clone();
        timer_worker().schedule(
          Some(delay),
          Box::new(move || {
            if !flag.load(Ordering::Acquire) {
              pool.spawn(task, flag);
            }
          }),
        );
      }
      _ => self.spawn(task, cancelled),
    }
    handle
  }
}
