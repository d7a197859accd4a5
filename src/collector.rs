use std::sync::{Condvar, Mutex};

use crate::Outcome;

/// A bounded barrier accumulating labeled results from a fixed number of
/// producers.
///
/// The combinators attach one listener per input promise; each listener adds
/// exactly one `(index, outcome)` entry, and the aggregation side blocks in
/// [`await_all`](ResultCollector::await_all) until all `expected` entries
/// have arrived. Writes beyond `expected` are dropped.
#[derive(Debug)]
pub struct ResultCollector<V> {
    expected: usize,
    entries: Mutex<Vec<(usize, Outcome<V>)>>,
    complete: Condvar,
}

impl<V: Clone> ResultCollector<V> {
    pub fn new(expected: usize) -> Self {
        ResultCollector {
            expected,
            entries: Mutex::new(Vec::with_capacity(expected)),
            complete: Condvar::new(),
        }
    }

    /// Number of results the barrier waits for.
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Records one producer's result.
    ///
    /// Callers guarantee at most one write per index; writes arriving after
    /// the barrier is full are dropped.
    pub fn add_result(&self, index: usize, outcome: Outcome<V>) {
        let mut entries = self.entries.lock().unwrap();
        if entries.len() >= self.expected {
            return;
        }
        entries.push((index, outcome));
        debug_assert!(entries.len() <= self.expected);
        self.complete.notify_all();
    }

    /// Blocks until all `expected` entries have arrived, then returns them
    /// in arrival order.
    pub fn await_all(&self) -> Vec<(usize, Outcome<V>)> {
        let mut entries = self.entries.lock().unwrap();
        while entries.len() < self.expected {
            entries = self.complete.wait(entries).unwrap();
        }
        entries.clone()
    }

    /// Non-blocking count of arrived entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
