//! Element transformation.

use std::{error::Error as StdError, sync::Arc};

use crate::{
  event::{Event, StreamError},
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Transforms every element with `f`; terminal events pass through.
  pub fn map<U, F>(&self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    F: Fn(T) -> U + Send + Sync + 'static,
  {
    let source = self.clone();
    let f = Arc::new(f);
    Observable::create(move |sink: Sink<U>| {
      let f = f.clone();
      source.subscribe_event(move |event| match event {
        Event::Next(v) => sink.next((*f)(v)),
        other => sink.forward(other.retag()),
      })
    })
  }

  /// Fallible `map`: an `Err` from `f` ends the stream with an operator
  /// error and severs the upstream subscription.
  pub fn try_map<U, E, F>(&self, f: F) -> Observable<U>
  where
    U: Send + 'static,
    E: Into<Box<dyn StdError + Send + Sync>>,
    F: Fn(T) -> Result<U, E> + Send + Sync + 'static,
  {
    let source = self.clone();
    let f = Arc::new(f);
    Observable::create(move |sink: Sink<U>| {
      let f = f.clone();
      let upstream = Upstream::new();
      let cut = upstream.clone();
      upstream.connect(&source, move |event: Event<T>| match event {
        Event::Next(v) => match (*f)(v) {
          Ok(mapped) => sink.next(mapped),
          Err(e) => {
            sink.error(StreamError::operator(e));
            cut.sever();
          }
        },
        other => sink.forward(other.retag()),
      })
    })
  }
}
