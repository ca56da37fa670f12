//! Strict sequential concatenation.

use std::sync::Arc;

use crate::{
  disposable::CompositeDisposable,
  event::Event,
  observable::Observable,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Runs the source to completion, then `next`, completing only after the
  /// last. An error anywhere aborts the whole chain.
  pub fn concat(&self, next: Observable<T>) -> Observable<T> {
    Observable::concat_all(vec![self.clone(), next])
  }

  /// `concat` over an arbitrary list of sources.
  pub fn concat_all(sources: Vec<Observable<T>>) -> Observable<T> {
    Observable::create(move |sink: Sink<T>| {
      let group = CompositeDisposable::new();
      chain(Arc::new(sources.clone()), 0, sink, group.clone());
      group.into_disposable()
    })
  }
}

fn chain<T: Send + 'static>(
  sources: Arc<Vec<Observable<T>>>,
  index: usize,
  sink: Sink<T>,
  group: CompositeDisposable,
) {
  let Some(source) = sources.get(index).cloned() else {
    sink.complete();
    return;
  };
  let next_sink = sink.clone();
  let next_group = group.clone();
  let sub = source.subscribe_event(move |event| match event {
    Event::Next(v) => next_sink.next(v),
    Event::Error(e) => next_sink.error(e),
    Event::Completed => {
      chain(sources.clone(), index + 1, next_sink.clone(), next_group.clone())
    }
  });
  group.add(sub);
}
