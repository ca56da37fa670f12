//! Rivulet is a push-based reactive stream engine: cold [`Observable`]
//! factories, hot [`subject`] multicasters, a library of composable
//! operators, and injectable [`scheduler`]s for moving production and
//! delivery between execution contexts.
//!
//! ```
//! use rivulet::prelude::*;
//!
//! let sum_of_even_squares = std::sync::Arc::new(std::sync::Mutex::new(0));
//! let total = sum_of_even_squares.clone();
//! Observable::range(1, 10)
//!   .filter(|v| v % 2 == 0)
//!   .map(|v| v * v)
//!   .reduce(0, |acc, v| acc + v)
//!   .subscribe(move |v| *total.lock().unwrap() = v);
//! assert_eq!(*sum_of_even_squares.lock().unwrap(), 220);
//! ```
//!
//! Everything is cold and synchronous until told otherwise: subscribing
//! runs the source factory on the calling thread, and concurrency enters a
//! pipeline only through `subscribe_on` / `observe_on` or the time-based
//! operators, all of which take an explicit scheduler. Every subscription
//! hands back a [`Disposable`]; disposing it stops delivery and releases
//! every resource the chain allocated, synchronously.
//!
//! [`Observable`]: observable::Observable
//! [`Disposable`]: disposable::Disposable

pub mod disposable;
pub mod event;
pub mod observable;
pub mod observer;
pub mod ops;
pub mod prelude;
pub mod scheduler;
pub mod sink;
pub mod subject;
