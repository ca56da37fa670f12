//! Cancellation handles for subscriptions and scheduled work.
//!
//! Every subscription hands back a [`Disposable`]; operators compose them
//! with [`CompositeDisposable`] (a disposal group that fires each child
//! exactly once) and [`SerialDisposable`] (a single slot where assigning a
//! new inner disposable disposes the previous one). [`ScopedDisposable`]
//! ties disposal to scope exit so a forgotten subscription cannot keep
//! timers alive past its logical owner.

use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

use parking_lot::Mutex;
use smallvec::SmallVec;

/// An idempotent, thread-safe cancel handle.
///
/// The teardown closure runs at most once, on whichever thread calls
/// `dispose` first. Cloning shares the same underlying handle.
#[derive(Clone)]
pub struct Disposable {
  inner: Arc<Inner>,
}

struct Inner {
  disposed: AtomicBool,
  teardown: Mutex<Option<Box<dyn FnOnce() + Send>>>,
}

impl Disposable {
  pub fn new(teardown: impl FnOnce() + Send + 'static) -> Self {
    Disposable {
      inner: Arc::new(Inner {
        disposed: AtomicBool::new(false),
        teardown: Mutex::new(Some(Box::new(teardown))),
      }),
    }
  }

  /// A handle with no teardown. Disposing it only flips the flag.
  pub fn empty() -> Self {
    Disposable {
      inner: Arc::new(Inner { disposed: AtomicBool::new(false), teardown: Mutex::new(None) }),
    }
  }

  pub fn dispose(&self) {
    if !self.inner.disposed.swap(true, Ordering::AcqRel) {
      let teardown = self.inner.teardown.lock().take();
      if let Some(teardown) = teardown {
        teardown();
      }
    }
  }

  pub fn is_disposed(&self) -> bool { self.inner.disposed.load(Ordering::Acquire) }

  /// Converts into an RAII guard that disposes on drop.
  pub fn scoped(self) -> ScopedDisposable { ScopedDisposable::new(self) }
}

impl Default for Disposable {
  fn default() -> Self { Disposable::empty() }
}

/// An unordered group of disposables, disposed together exactly once.
///
/// Children added after the group was disposed are disposed immediately.
#[derive(Clone, Default)]
pub struct CompositeDisposable {
  inner: Arc<Mutex<CompositeInner>>,
}

#[derive(Default)]
struct CompositeInner {
  disposed: bool,
  children: SmallVec<[Disposable; 2]>,
}

impl CompositeDisposable {
  pub fn new() -> Self { Self::default() }

  pub fn add(&self, disposable: Disposable) {
    let dispose_now = {
      let mut inner = self.inner.lock();
      if inner.disposed {
        true
      } else {
        inner.children.retain(|c| !c.is_disposed());
        inner.children.push(disposable.clone());
        false
      }
    };
    if dispose_now {
      disposable.dispose();
    }
  }

  pub fn dispose(&self) {
    let children = {
      let mut inner = self.inner.lock();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      std::mem::take(&mut inner.children)
    };
    for child in children {
      child.dispose();
    }
  }

  pub fn is_disposed(&self) -> bool { self.inner.lock().disposed }

  pub fn len(&self) -> usize { self.inner.lock().children.len() }

  pub fn is_empty(&self) -> bool { self.inner.lock().children.is_empty() }

  pub fn into_disposable(self) -> Disposable { Disposable::new(move || self.dispose()) }
}

/// Holds at most one live inner disposable; replacing disposes the old one.
#[derive(Clone, Default)]
pub struct SerialDisposable {
  inner: Arc<Mutex<SerialInner>>,
}

#[derive(Default)]
struct SerialInner {
  disposed: bool,
  current: Option<Disposable>,
}

impl SerialDisposable {
  pub fn new() -> Self { Self::default() }

  /// Installs `disposable` as the current inner, disposing the previous one.
  /// If this slot was already disposed the new inner is disposed at once.
  pub fn replace(&self, disposable: Disposable) {
    let to_dispose = {
      let mut inner = self.inner.lock();
      if inner.disposed {
        Some(disposable)
      } else {
        inner.current.replace(disposable)
      }
    };
    if let Some(old) = to_dispose {
      old.dispose();
    }
  }

  pub fn dispose(&self) {
    let current = {
      let mut inner = self.inner.lock();
      if inner.disposed {
        return;
      }
      inner.disposed = true;
      inner.current.take()
    };
    if let Some(current) = current {
      current.dispose();
    }
  }

  pub fn is_disposed(&self) -> bool { self.inner.lock().disposed }

  pub fn into_disposable(self) -> Disposable { Disposable::new(move || self.dispose()) }
}

/// RAII wrapper: the inner disposable is disposed when the guard drops.
///
/// Not `Clone` — a scope owns its subscriptions exactly once.
#[must_use = "dropping a ScopedDisposable disposes it immediately"]
pub struct ScopedDisposable {
  inner: Option<Disposable>,
}

impl ScopedDisposable {
  pub fn new(inner: Disposable) -> Self { ScopedDisposable { inner: Some(inner) } }

  /// Releases the guard without disposing, returning the raw handle.
  pub fn forget(mut self) -> Disposable {
    self.inner.take().unwrap_or_else(Disposable::empty)
  }
}

impl Drop for ScopedDisposable {
  fn drop(&mut self) {
    if let Some(inner) = self.inner.take() {
      inner.dispose();
    }
  }
}
