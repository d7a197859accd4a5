#[cfg(test)]
mod tests {
    use promise_sync::{Error, Outcome, Promise, Status};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::{thread, time::Duration};

    fn delayed(value: i32, delay: Duration) -> Promise<i32> {
        Promise::new(move |resolve, _reject| {
            thread::sleep(delay);
            resolve.resolve(value);
        })
    }

    #[test]
    fn executor_resolution_is_observed() {
        let promise = delayed(7, Duration::from_millis(20));
        assert_eq!(promise.wait(), Outcome::Value(7));
        assert_eq!(promise.status(), Status::Fulfilled);
    }

    #[test]
    fn then_maps_the_value() {
        let promise = Promise::resolve(5).then(|n| n * 2);
        assert_eq!(promise.wait().value(), 10);
    }

    #[test]
    fn then_forwards_rejection() {
        let promise: Promise<i32> = Promise::reject("boom");
        let chained = promise.then(|n| n + 1);
        assert_eq!(chained.wait().error(), Error::Rejected("boom".into()));
    }

    #[test]
    fn then_catch_observes_and_propagates() {
        let observed = Arc::new(AtomicBool::new(false));
        let seen = observed.clone();
        let promise: Promise<i32> = Promise::reject("nope");
        let chained = promise.then_catch(
            |n| n * 2,
            move |err| {
                assert_eq!(err, Error::Rejected("nope".into()));
                seen.store(true, Ordering::SeqCst);
            },
        );
        assert_eq!(chained.wait().error(), Error::Rejected("nope".into()));
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn then_catch_skips_the_handler_on_success() {
        let promise =
            Promise::resolve(3).then_catch(|n| n + 1, |_err| panic!("handler must not run"));
        assert_eq!(promise.wait().value(), 4);
    }

    #[test]
    fn catch_error_passes_a_value_through() {
        let promise = Promise::resolve(9).catch_error(|_err| panic!("no rejection to observe"));
        assert_eq!(promise.wait().value(), 9);
    }

    #[test]
    fn catch_error_observes_then_rechains() {
        let observed = Arc::new(AtomicBool::new(false));
        let seen = observed.clone();
        let promise: Promise<i32> = Promise::reject("fell over");
        let downstream = promise
            .catch_error(move |_err| seen.store(true, Ordering::SeqCst))
            .then_catch(
                |n| n,
                |err| assert_eq!(err, Error::Rejected("fell over".into())),
            );
        assert_eq!(downstream.wait().error(), Error::Rejected("fell over".into()));
        assert!(observed.load(Ordering::SeqCst));
    }

    #[test]
    fn and_finally_observes_both_branches() {
        let fulfilled = Promise::resolve(1).and_finally(|outcome| assert!(outcome.is_value()));
        assert_eq!(fulfilled.wait().value(), 1);

        let rejected: Promise<i32> = Promise::reject("late");
        let settled = rejected.and_finally(|outcome| assert!(outcome.has_error()));
        assert_eq!(settled.wait().error(), Error::Rejected("late".into()));
    }

    #[test]
    fn unsettled_executor_stays_pending() {
        let promise: Promise<i32> = Promise::new(|_resolve, _reject| {});
        assert_eq!(promise.wait_timeout(Duration::from_millis(50)), None);
        assert_eq!(promise.status(), Status::Pending);
    }

    #[test]
    fn executor_race_keeps_the_first_settlement() {
        let promise = Promise::new(|resolve, reject| {
            resolve.resolve(1);
            reject.reject("too late");
            resolve.resolve(2);
        });
        assert_eq!(promise.wait(), Outcome::Value(1));
    }

    #[test]
    fn chains_compose() {
        let promise = delayed(2, Duration::from_millis(10))
            .then(|n| n + 1)
            .then(|n| n * n);
        assert_eq!(promise.wait().value(), 9);
    }

    #[test]
    fn chaining_never_blocks_the_caller() {
        let before = std::time::Instant::now();
        let promise = delayed(1, Duration::from_millis(200)).then(|n| n);
        assert!(before.elapsed() < Duration::from_millis(100));
        assert_eq!(promise.wait().value(), 1);
    }
}
