//! The aggregate promise operations: `race`, `any`, `all` and
//! `all_settled`.
//!
//! Each operation attaches one listener task per input promise. The
//! listeners settle the result cell directly where a single input decides
//! the result (first settlement for `race`, first fulfillment for `any`,
//! first rejection for `all`) and feed a [`ResultCollector`] otherwise; a
//! separate aggregation task drains the collector to decide the cases that
//! need every input. Settlement idempotence resolves all the races: the
//! first settler of the result cell wins, later ones are no-ops.
//!
//! Positional results (`all`, `all_settled`, the errors inside
//! [`Error::AllRejected`]) are ordered by input index, never by completion
//! order.

use std::sync::Arc;

use crate::cell::SettlementCell;
use crate::collector::ResultCollector;
use crate::pool;
use crate::promise::Promise;
use crate::{Error, Outcome};

/// Settles like whichever input settles first, value or error.
///
/// With no inputs there is nothing that can ever win, so the returned
/// promise stays pending forever.
pub fn race<V, I>(promises: I) -> Promise<V>
where
    V: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<V>>,
{
    let cell = Arc::new(SettlementCell::new());
    for input in promises {
        let cell = cell.clone();
        pool::spawn(move || match input.wait() {
            Outcome::Value(value) => {
                cell.resolve(value);
            }
            Outcome::Error(err) => {
                cell.reject(err);
            }
        });
    }
    Promise::from_cell(cell)
}

/// Fulfills with the first input that fulfills.
///
/// Rejects only when every input has rejected — with
/// [`Error::AllRejected`] carrying the individual errors in input order —
/// or immediately with [`Error::NoPromises`] when there are no inputs at
/// all.
pub fn any<V, I>(promises: I) -> Promise<V>
where
    V: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<V>>,
{
    let inputs: Vec<Promise<V>> = promises.into_iter().collect();
    if inputs.is_empty() {
        return Promise::reject(Error::NoPromises);
    }
    let cell = Arc::new(SettlementCell::new());
    let collector = Arc::new(ResultCollector::new(inputs.len()));
    for (index, input) in inputs.into_iter().enumerate() {
        let cell = cell.clone();
        let collector = collector.clone();
        pool::spawn(move || {
            let outcome = input.wait();
            if let Outcome::Value(value) = &outcome {
                cell.resolve(value.clone());
            }
            collector.add_result(index, outcome);
        });
    }
    {
        let cell = cell.clone();
        pool::spawn(move || {
            let entries = collector.await_all();
            if entries.iter().all(|(_, outcome)| outcome.has_error()) {
                cell.reject(Error::AllRejected(errors_by_index(entries)));
            }
        });
    }
    Promise::from_cell(cell)
}

/// Fulfills with every input's value in input order, or rejects with the
/// first error without waiting for the remaining inputs.
pub fn all<V, I>(promises: I) -> Promise<Vec<V>>
where
    V: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<V>>,
{
    let inputs: Vec<Promise<V>> = promises.into_iter().collect();
    if inputs.is_empty() {
        return Promise::resolve(Vec::new());
    }
    let cell = Arc::new(SettlementCell::new());
    let collector = Arc::new(ResultCollector::new(inputs.len()));
    for (index, input) in inputs.into_iter().enumerate() {
        let cell = cell.clone();
        let collector = collector.clone();
        pool::spawn(move || {
            let outcome = input.wait();
            if let Outcome::Error(err) = &outcome {
                cell.reject(err.clone());
            }
            collector.add_result(index, outcome);
        });
    }
    {
        let cell = cell.clone();
        pool::spawn(move || {
            let entries = collector.await_all();
            if entries.iter().all(|(_, outcome)| outcome.is_value()) {
                cell.resolve(values_by_index(entries));
            }
        });
    }
    Promise::from_cell(cell)
}

/// Fulfills with every input's outcome, error or value alike, in input
/// order. Never rejects.
pub fn all_settled<V, I>(promises: I) -> Promise<Vec<Outcome<V>>>
where
    V: Clone + Send + 'static,
    I: IntoIterator<Item = Promise<V>>,
{
    let inputs: Vec<Promise<V>> = promises.into_iter().collect();
    if inputs.is_empty() {
        return Promise::resolve(Vec::new());
    }
    let cell = Arc::new(SettlementCell::new());
    let collector = Arc::new(ResultCollector::new(inputs.len()));
    for (index, input) in inputs.into_iter().enumerate() {
        let collector = collector.clone();
        pool::spawn(move || collector.add_result(index, input.wait()));
    }
    {
        let cell = cell.clone();
        pool::spawn(move || {
            let entries = collector.await_all();
            cell.resolve(outcomes_by_index(entries));
        });
    }
    Promise::from_cell(cell)
}

// The helpers below position arrival-ordered entries by input index. A
// missing or doubled index means a combinator broke the one-write-per-index
// contract, which is a logic bug worth a panic.

fn values_by_index<V>(entries: Vec<(usize, Outcome<V>)>) -> Vec<V> {
    let mut slots: Vec<Option<V>> = Vec::new();
    slots.resize_with(entries.len(), || None);
    for (index, outcome) in entries {
        slots[index] = Some(outcome.value());
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("one value per input index"))
        .collect()
}

fn errors_by_index<V>(entries: Vec<(usize, Outcome<V>)>) -> Vec<Error> {
    let mut slots: Vec<Option<Error>> = Vec::new();
    slots.resize_with(entries.len(), || None);
    for (index, outcome) in entries {
        slots[index] = Some(outcome.error());
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("one rejection per input index"))
        .collect()
}

fn outcomes_by_index<V>(entries: Vec<(usize, Outcome<V>)>) -> Vec<Outcome<V>> {
    let mut slots: Vec<Option<Outcome<V>>> = Vec::new();
    slots.resize_with(entries.len(), || None);
    for (index, outcome) in entries {
        slots[index] = Some(outcome);
    }
    slots
        .into_iter()
        .map(|slot| slot.expect("one outcome per input index"))
        .collect()
}
