//! Inline scheduler.

use std::time::Duration;

use crate::{
  disposable::Disposable,
  scheduler::{Scheduler, Task},
};

/// Runs every task synchronously in the calling context.
///
/// Delays block the caller; this scheduler exists for deterministic
/// single-threaded pipelines and tests, not for timing work.
#[derive(Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
  fn schedule(&self, delay: Option<Duration>, task: Task) -> Disposable {
    if let Some(delay) = delay {
      if !delay.is_zero() {
        std::thread::sleep(delay);
      }
    }
    task();
    Disposable::empty()
  }
}

#[cfg(test)]
mod test {
  use std::sync::{Arc, Mutex};

  use super::*;

  #[test]
  fn runs_inline() {
    let ran = Arc::new(Mutex::new(false));
    let flag = ran.clone();
    ImmediateScheduler.schedule(None, Box::new(move || *flag.lock().unwrap() = true));
    assert!(*ran.lock().unwrap());
  }
}
