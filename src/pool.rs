//! Growable worker set running executor and continuation tasks.
//!
//! Continuation tasks block on the settlement of their parent promise, so
//! workers routinely sit inside a condvar wait for each other's output. The
//! pool therefore must grow whenever queued jobs outnumber idle workers: a
//! fixed-size pool would deadlock as soon as a chain of blocked
//! continuations filled it. Idle workers linger for a keep-alive window and
//! then retire.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, OnceLock};
use std::thread;
use std::time::Duration;

type Job = Box<dyn FnOnce() + Send + 'static>;

const KEEP_ALIVE: Duration = Duration::from_millis(500);

static POOL: OnceLock<TaskPool> = OnceLock::new();

/// Runs `job` on the shared pool, starting a new worker if none is free to
/// take it.
pub(crate) fn spawn<F>(job: F)
where
    F: FnOnce() + Send + 'static,
{
    POOL.get_or_init(TaskPool::new).submit(Box::new(job));
}

struct TaskPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    state: Mutex<PoolState>,
    work: Condvar,
    next_worker: AtomicUsize,
}

struct PoolState {
    jobs: VecDeque<Job>,
    idle: usize,
}

impl TaskPool {
    fn new() -> Self {
        TaskPool {
            inner: Arc::new(PoolInner {
                state: Mutex::new(PoolState {
                    jobs: VecDeque::new(),
                    idle: 0,
                }),
                work: Condvar::new(),
                next_worker: AtomicUsize::new(0),
            }),
        }
    }

    fn submit(&self, job: Job) {
        let must_grow;
        {
            let mut state = self.inner.state.lock().unwrap();
            state.jobs.push_back(job);
            // An idle worker is one parked in the wait loop below, never one
            // blocked inside a job, so every queued job needs its own.
            must_grow = state.jobs.len() > state.idle;
            self.inner.work.notify_one();
        }
        if must_grow {
            self.start_worker();
        }
    }

    fn start_worker(&self) {
        let inner = self.inner.clone();
        let id = inner.next_worker.fetch_add(1, Ordering::Relaxed);
        let name = format!("promise-worker-{id}");
        thread::Builder::new()
            .name(name.clone())
            .spawn(move || {
                log::trace!("worker '{name}' starting");
                worker_loop(&inner);
                log::trace!("worker '{name}' retiring");
            })
            .expect("failed to spawn promise worker thread");
    }
}

fn worker_loop(inner: &PoolInner) {
    loop {
        let job = {
            let mut state = inner.state.lock().unwrap();
            loop {
                if let Some(job) = state.jobs.pop_front() {
                    break job;
                }
                state.idle += 1;
                let (guard, timeout) = inner.work.wait_timeout(state, KEEP_ALIVE).unwrap();
                state = guard;
                state.idle -= 1;
                if timeout.timed_out() && state.jobs.is_empty() {
                    return;
                }
            }
        };
        job();
    }
}
