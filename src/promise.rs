use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use crate::cell::{SettlementCell, Status};
use crate::pool;
use crate::{Error, Outcome};

/// A single-assignment asynchronous value with JavaScript promise
/// semantics.
///
/// A promise is created pending, with an executor closure that receives the
/// settlement handles and eventually fulfills or rejects it — at most once;
/// later settlement attempts change nothing. Clones share the same
/// underlying [`SettlementCell`], so a promise can be waited on, chained
/// from, and fed to the combinators all at the same time.
///
/// # Examples
///
/// ```
/// use promise_sync::Promise;
/// use std::{thread, time::Duration};
///
/// let promise = Promise::new(|resolve, _reject| {
///     thread::sleep(Duration::from_millis(10));
///     resolve.resolve(String::from("🍓"));
/// });
/// let doubled = promise.then(|s| format!("{s}{s}"));
/// assert_eq!(doubled.wait().value(), "🍓🍓");
/// ```
#[derive(Debug)]
pub struct Promise<V> {
    cell: Arc<SettlementCell<V>>,
}

impl<V> Clone for Promise<V> {
    fn clone(&self) -> Self {
        Promise {
            cell: self.cell.clone(),
        }
    }
}

impl<V: Clone + Send + 'static> Promise<V> {
    /// Creates a promise and hands `executor` its settlement handles.
    ///
    /// The executor runs on its own pool task, so construction never
    /// blocks, even when the executor does. An executor that calls neither
    /// handle leaves the promise pending forever; that is a valid state,
    /// not an error, and anyone waiting on the promise blocks until the
    /// process exits.
    pub fn new<F>(executor: F) -> Self
    where
        F: FnOnce(Resolver<V>, Rejector<V>) + Send + 'static,
    {
        let cell = Arc::new(SettlementCell::new());
        let resolver = Resolver { cell: cell.clone() };
        let rejector = Rejector { cell: cell.clone() };
        pool::spawn(move || executor(resolver, rejector));
        Promise { cell }
    }

    /// A promise already fulfilled with `value`.
    pub fn resolve(value: V) -> Self {
        let cell = Arc::new(SettlementCell::new());
        cell.resolve(value);
        Promise { cell }
    }

    /// A promise already rejected with `error`.
    pub fn reject(error: impl Into<Error>) -> Self {
        let cell = Arc::new(SettlementCell::new());
        cell.reject(error.into());
        Promise { cell }
    }

    pub(crate) fn from_cell(cell: Arc<SettlementCell<V>>) -> Self {
        Promise { cell }
    }

    /// Derives a promise holding the fulfillment value mapped through
    /// `on_resolve`.
    ///
    /// A rejected parent's error is forwarded unchanged to the derived
    /// promise, the same as the two-handler form does.
    pub fn then<U, F>(&self, on_resolve: F) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(V) -> U + Send + 'static,
    {
        let parent = self.cell.clone();
        derive(move |cell| match parent.wait() {
            Outcome::Value(value) => {
                cell.resolve(on_resolve(value));
            }
            Outcome::Error(err) => {
                cell.reject(err);
            }
        })
    }

    /// Like [`then`](Promise::then), with a rejection observer: on a
    /// rejected parent, `on_reject` sees the error before the derived
    /// promise rejects with it.
    pub fn then_catch<U, F, H>(&self, on_resolve: F, on_reject: H) -> Promise<U>
    where
        U: Clone + Send + 'static,
        F: FnOnce(V) -> U + Send + 'static,
        H: FnOnce(Error) + Send + 'static,
    {
        let parent = self.cell.clone();
        derive(move |cell| match parent.wait() {
            Outcome::Value(value) => {
                cell.resolve(on_resolve(value));
            }
            Outcome::Error(err) => {
                on_reject(err.clone());
                cell.reject(err);
            }
        })
    }

    /// Observes a rejection without consuming it.
    ///
    /// A fulfilled parent's value passes through unchanged. A rejected
    /// parent's error is shown to `on_reject` and then re-rejected, so the
    /// chain below a `catch_error` keeps seeing it.
    pub fn catch_error<H>(&self, on_reject: H) -> Promise<V>
    where
        H: FnOnce(Error) + Send + 'static,
    {
        let parent = self.cell.clone();
        derive(move |cell| match parent.wait() {
            Outcome::Value(value) => {
                cell.resolve(value);
            }
            Outcome::Error(err) => {
                on_reject(err.clone());
                cell.reject(err);
            }
        })
    }

    /// Runs `on_settle` on the outcome, whichever branch it is, then
    /// settles the derived promise with that same outcome.
    pub fn and_finally<H>(&self, on_settle: H) -> Promise<V>
    where
        H: FnOnce(Outcome<V>) + Send + 'static,
    {
        let parent = self.cell.clone();
        derive(move |cell| {
            let outcome = parent.wait();
            on_settle(outcome.clone());
            match outcome {
                Outcome::Value(value) => {
                    cell.resolve(value);
                }
                Outcome::Error(err) => {
                    cell.reject(err);
                }
            }
        })
    }

    /// Blocks the calling thread until the promise settles.
    pub fn wait(&self) -> Outcome<V> {
        self.cell.wait()
    }

    /// Deadline variant of [`wait`](Promise::wait); `None` while still
    /// pending.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Outcome<V>> {
        self.cell.wait_timeout(timeout)
    }

    /// Non-blocking status snapshot.
    pub fn status(&self) -> Status {
        self.cell.status()
    }

    /// An awaitable view of this promise for async callers.
    pub fn waiter(&self) -> Waiter<V> {
        Waiter {
            cell: self.cell.clone(),
        }
    }
}

/// Spawns one task that drives the derived promise's cell.
///
/// The task is the only place a chaining operation ever blocks; the caller
/// of `then`/`catch_error`/`and_finally` returns immediately. No cell's
/// lock is taken while another cell's lock is held.
fn derive<U, F>(task: F) -> Promise<U>
where
    U: Clone + Send + 'static,
    F: FnOnce(&SettlementCell<U>) + Send + 'static,
{
    let cell = Arc::new(SettlementCell::new());
    let child = cell.clone();
    pool::spawn(move || task(&child));
    Promise { cell }
}

/// Fulfillment handle handed to the executor.
///
/// Calling [`resolve`](Resolver::resolve) after the promise has settled is
/// a no-op.
#[derive(Debug)]
pub struct Resolver<V> {
    cell: Arc<SettlementCell<V>>,
}

impl<V> Clone for Resolver<V> {
    fn clone(&self) -> Self {
        Resolver {
            cell: self.cell.clone(),
        }
    }
}

impl<V: Clone> Resolver<V> {
    pub fn resolve(&self, value: V) {
        self.cell.resolve(value);
    }
}

/// Rejection handle handed to the executor.
///
/// Calling [`reject`](Rejector::reject) after the promise has settled is a
/// no-op.
#[derive(Debug)]
pub struct Rejector<V> {
    cell: Arc<SettlementCell<V>>,
}

impl<V> Clone for Rejector<V> {
    fn clone(&self) -> Self {
        Rejector {
            cell: self.cell.clone(),
        }
    }
}

impl<V: Clone> Rejector<V> {
    pub fn reject(&self, error: impl Into<Error>) {
        self.cell.reject(error.into());
    }
}

/// An awaitable handle to a promise, for use from async code.
///
/// Polling parks the task's waker in the settlement cell; settling the
/// promise wakes every parked waker. Waiters may be cloned and awaited from
/// any executor — the crate itself depends on none.
#[derive(Debug)]
pub struct Waiter<V> {
    cell: Arc<SettlementCell<V>>,
}

impl<V> Clone for Waiter<V> {
    fn clone(&self) -> Self {
        Waiter {
            cell: self.cell.clone(),
        }
    }
}

impl<V: Clone> Future for Waiter<V> {
    type Output = Outcome<V>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match self.cell.poll_outcome(cx.waker()) {
            Some(outcome) => Poll::Ready(outcome),
            None => Poll::Pending,
        }
    }
}
