//! JavaScript-style promises built from threads, mutexes and condition
//! variables — no async runtime underneath.
//!
//! A [`Promise`] is a single-assignment value container: it starts out
//! pending and settles exactly once, either fulfilled with a value or
//! rejected with an [`Error`]. Settling is driven by an executor closure
//! handed a [`Resolver`] and a [`Rejector`] at construction. Derived
//! promises ([`Promise::then`] and friends) and the aggregate operations
//! ([`race`], [`any`], [`all`], [`all_settled`]) each run on their own task
//! in an internal worker pool, blocking only on the settlement of the
//! promises they depend on.
//!
//! # Examples
//!
//! ```
//! use promise_sync::{all, Promise};
//! use std::{thread, time::Duration};
//!
//! let slow = Promise::new(|resolve, _reject| {
//!     thread::sleep(Duration::from_millis(20));
//!     resolve.resolve(2);
//! });
//! let scaled = slow.then(|n| n * 10);
//! assert_eq!(scaled.wait().value(), 20);
//!
//! let sum = all(vec![Promise::resolve(1), Promise::resolve(2)])
//!     .then(|values| values.into_iter().sum::<i32>());
//! assert_eq!(sum.wait().value(), 3);
//! ```
//!
//! Settlement is idempotent: once a promise is settled, later calls on its
//! handles change nothing. An executor that never calls either handle
//! leaves its promise pending forever; anyone waiting on such a promise
//! blocks indefinitely, exactly as with an unsettled JavaScript promise.

pub mod cell;
pub mod collector;
pub mod combine;
pub mod outcome;
mod pool;
pub mod promise;

pub use cell::{SettlementCell, Status};
pub use collector::ResultCollector;
pub use combine::{all, all_settled, any, race};
pub use outcome::Outcome;
pub use promise::{Promise, Rejector, Resolver, Waiter};

/// The rejection value carried by every rejected promise.
///
/// Caller rejections travel through the chain as [`Error::Rejected`] and are
/// never inspected by the machinery itself; the remaining variants are
/// synthesized by [`any`] to describe collective failure.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A rejection raised by caller code, carried through untouched.
    #[error("{0}")]
    Rejected(String),
    /// `any` was given an empty input list, so nothing can ever fulfill.
    #[error("no promises were given")]
    NoPromises,
    /// Every input to `any` rejected. The individual rejections are kept in
    /// input order.
    #[error("all promises were rejected")]
    AllRejected(Vec<Error>),
}

impl From<&str> for Error {
    fn from(message: &str) -> Self {
        Error::Rejected(message.to_owned())
    }
}

impl From<String> for Error {
    fn from(message: String) -> Self {
        Error::Rejected(message)
    }
}
