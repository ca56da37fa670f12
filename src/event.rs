//! Event type and the error taxonomy carried by error events.

use std::{error::Error as StdError, sync::Arc, time::Duration};

use thiserror::Error;

/// Shared, cheaply cloneable error cause.
pub type Cause = Arc<dyn StdError + Send + Sync + 'static>;

/// Why a stream failed.
///
/// Errors are terminal: once one is delivered no further `Next` events reach
/// that observer. The payload is `Arc`-backed so events stay `Clone` and can
/// be multicast to any number of observers.
#[derive(Debug, Clone, Error)]
pub enum StreamError {
  /// A producer explicitly signaled failure.
  #[error("upstream failure: {0}")]
  Upstream(Cause),
  /// An operator's own transform failed; treated identically to an upstream
  /// failure once observed downstream.
  #[error("operator failure: {0}")]
  Operator(Cause),
  /// A time-based operator's deadline elapsed with no qualifying element.
  #[error("no element within {0:?}")]
  Timeout(Duration),
}

impl StreamError {
  pub fn upstream(cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
    StreamError::Upstream(Arc::from(cause.into()))
  }

  pub fn operator(cause: impl Into<Box<dyn StdError + Send + Sync>>) -> Self {
    StreamError::Operator(Arc::from(cause.into()))
  }

  pub fn is_timeout(&self) -> bool { matches!(self, StreamError::Timeout(_)) }
}

/// A single notification flowing through a stream.
///
/// `Error` and `Completed` are terminal: after either is delivered to an
/// observer, that observer never receives another event.
#[derive(Debug, Clone)]
pub enum Event<T> {
  Next(T),
  Error(StreamError),
  Completed,
}

impl<T> Event<T> {
  #[inline]
  pub fn is_terminal(&self) -> bool { !matches!(self, Event::Next(_)) }

  /// Re-tag a terminal event with another payload type.
  ///
  /// Panics on `Next`; callers match on `Next` before reaching for this.
  pub(crate) fn retag<U>(self) -> Event<U> {
    match self {
      Event::Next(_) => unreachable!("retag called on a Next event"),
      Event::Error(e) => Event::Error(e),
      Event::Completed => Event::Completed,
    }
  }
}
