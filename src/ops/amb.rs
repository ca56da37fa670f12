//! First-to-emit racing.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::{
  disposable::{CompositeDisposable, Disposable},
  event::Event,
  observable::Observable,
  ops::Upstream,
  sink::Sink,
};

impl<T: Send + 'static> Observable<T> {
  /// Races the source against `other`: whichever produces an event first
  /// wins; the loser is severed and ignored from then on.
  pub fn amb(&self, other: Observable<T>) -> Observable<T> {
    let a = self.clone();
    let b = other;
    Observable::create(move |sink: Sink<T>| {
      let winner = Arc::new(Mutex::new(None::<usize>));
      let up_a = Upstream::new();
      let up_b = Upstream::new();
      let group = CompositeDisposable::new();

      group.add(arm(0, &a, &up_a, up_b.clone(), winner.clone(), sink.clone()));
      if sink.is_active() && winner.lock().is_none() {
        group.add(arm(1, &b, &up_b, up_a.clone(), winner, sink));
      }
      group.into_disposable()
    })
  }
}

fn arm<T: Send + 'static>(
  index: usize,
  source: &Observable<T>,
  mine: &Upstream<T>,
  rival: Upstream<T>,
  winner: Arc<Mutex<Option<usize>>>,
  sink: Sink<T>,
) -> Disposable {
  mine.connect(source, move |event: Event<T>| {
    let wins = {
      let mut w = winner.lock();
      match *w {
        None => {
          *w = Some(index);
          true
        }
        Some(chosen) => chosen == index,
      }
    };
    if wins {
      rival.sever();
      sink.forward(event);
    }
  })
}
