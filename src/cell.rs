use std::sync::{Condvar, Mutex};
use std::task::Waker;
use std::time::{Duration, Instant};

use crate::{Error, Outcome};

/// Where a promise is in its lifecycle.
///
/// Monotonic: once a cell leaves `Pending` it never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Pending,
    Fulfilled,
    Rejected,
}

#[derive(Debug)]
struct State<V> {
    status: Status,
    // Some iff status != Pending.
    outcome: Option<Outcome<V>>,
    wakers: Vec<Waker>,
}

/// The monitor-guarded single-assignment slot every promise sits on.
///
/// One mutex and one condition variable guard the status/outcome pair. The
/// first of [`resolve`](SettlementCell::resolve) and
/// [`reject`](SettlementCell::reject) wins; everything after that is a
/// no-op, which is what lets any number of racing settlers target the same
/// cell safely. Waiters re-check the status in a loop, so spurious wakeups
/// are harmless, and notification happens while the lock is held, so no
/// wakeup can be lost.
#[derive(Debug)]
pub struct SettlementCell<V> {
    state: Mutex<State<V>>,
    settled: Condvar,
}

impl<V: Clone> SettlementCell<V> {
    pub fn new() -> Self {
        SettlementCell {
            state: Mutex::new(State {
                status: Status::Pending,
                outcome: None,
                wakers: Vec::new(),
            }),
            settled: Condvar::new(),
        }
    }

    /// Fulfills the cell with `value`.
    ///
    /// Returns whether this call was the one that settled the cell; `false`
    /// means it was already settled and nothing changed.
    pub fn resolve(&self, value: V) -> bool {
        self.settle(Status::Fulfilled, Outcome::Value(value))
    }

    /// Rejects the cell with `error`. Same first-caller-wins contract as
    /// [`resolve`](SettlementCell::resolve).
    pub fn reject(&self, error: Error) -> bool {
        self.settle(Status::Rejected, Outcome::Error(error))
    }

    fn settle(&self, status: Status, outcome: Outcome<V>) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.status != Status::Pending {
            return false;
        }
        state.status = status;
        state.outcome = Some(outcome);
        self.settled.notify_all();
        for waker in state.wakers.drain(..) {
            waker.wake();
        }
        true
    }

    /// Blocks the calling thread until the cell settles, then returns the
    /// final outcome.
    ///
    /// Every waiter, however many and whenever they arrive, observes the
    /// same outcome. On a cell whose promise never settles this blocks
    /// forever.
    pub fn wait(&self) -> Outcome<V> {
        let mut state = self.state.lock().unwrap();
        while state.status == Status::Pending {
            state = self.settled.wait(state).unwrap();
        }
        state
            .outcome
            .clone()
            .expect("settled cell must hold an outcome")
    }

    /// Deadline variant of [`wait`](SettlementCell::wait); `None` if the
    /// cell is still pending when the timeout elapses.
    pub fn wait_timeout(&self, timeout: Duration) -> Option<Outcome<V>> {
        let deadline = Instant::now() + timeout;
        let mut state = self.state.lock().unwrap();
        while state.status == Status::Pending {
            let remaining = deadline.checked_duration_since(Instant::now())?;
            let (guard, _) = self.settled.wait_timeout(state, remaining).unwrap();
            state = guard;
        }
        Some(
            state
                .outcome
                .clone()
                .expect("settled cell must hold an outcome"),
        )
    }

    /// Non-blocking status snapshot.
    pub fn status(&self) -> Status {
        self.state.lock().unwrap().status
    }

    /// Non-blocking outcome snapshot; `None` while pending.
    pub fn try_outcome(&self) -> Option<Outcome<V>> {
        self.state.lock().unwrap().outcome.clone()
    }

    /// Returns the outcome if settled, otherwise parks `waker` to be woken
    /// on settlement.
    pub(crate) fn poll_outcome(&self, waker: &Waker) -> Option<Outcome<V>> {
        let mut state = self.state.lock().unwrap();
        match &state.outcome {
            Some(outcome) => Some(outcome.clone()),
            None => {
                state.wakers.push(waker.clone());
                None
            }
        }
    }
}

impl<V: Clone> Default for SettlementCell<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn first_settlement_wins_under_contention() {
        for _ in 0..50 {
            let cell = Arc::new(SettlementCell::new());
            let left = cell.clone();
            let right = cell.clone();
            let a = thread::spawn(move || left.resolve(1));
            let b = thread::spawn(move || right.resolve(2));
            let a_won = a.join().unwrap();
            let b_won = b.join().unwrap();
            assert!(a_won ^ b_won);
            assert_eq!(cell.status(), Status::Fulfilled);
            let value = cell.wait().value();
            if a_won {
                assert_eq!(value, 1);
            } else {
                assert_eq!(value, 2);
            }
        }
    }

    #[test]
    fn settlement_is_idempotent_across_kinds() {
        let cell = SettlementCell::new();
        assert!(cell.resolve(10));
        assert!(!cell.reject(Error::Rejected("late".into())));
        assert!(!cell.resolve(11));
        assert_eq!(cell.status(), Status::Fulfilled);
        assert_eq!(cell.wait(), Outcome::Value(10));
    }

    #[test]
    fn every_waiter_sees_the_same_outcome() {
        let cell = Arc::new(SettlementCell::new());
        let waiters: Vec<_> = (0..4)
            .map(|_| {
                let cell = cell.clone();
                thread::spawn(move || cell.wait())
            })
            .collect();
        thread::sleep(Duration::from_millis(20));
        cell.resolve(String::from("done"));
        for waiter in waiters {
            assert_eq!(waiter.join().unwrap(), Outcome::Value(String::from("done")));
        }
    }

    #[test]
    fn wait_timeout_expires_while_pending() {
        let cell: SettlementCell<i32> = SettlementCell::new();
        assert_eq!(cell.wait_timeout(Duration::from_millis(20)), None);
        cell.resolve(1);
        assert_eq!(
            cell.wait_timeout(Duration::from_millis(20)),
            Some(Outcome::Value(1))
        );
    }

    #[test]
    fn snapshots_do_not_block() {
        let cell: SettlementCell<i32> = SettlementCell::new();
        assert_eq!(cell.status(), Status::Pending);
        assert_eq!(cell.try_outcome(), None);
        cell.reject(Error::Rejected("gone".into()));
        assert_eq!(cell.status(), Status::Rejected);
        assert_eq!(
            cell.try_outcome(),
            Some(Outcome::Error(Error::Rejected("gone".into())))
        );
    }
}
