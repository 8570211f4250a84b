use super::Job;

use parking_lot::{Condvar, Mutex};

use std::collections::VecDeque;

/// Shared job queue of a pool.
///
/// Submitted jobs are appended at the back and taken from the front by
/// whichever worker wakes first, so a pool runs its jobs in submission order
/// (a single-worker pool runs them strictly one after another).
///
/// Idle workers sleep on the condition variable until a job arrives or the
/// pool shuts down.
pub(crate) struct Injector {
    /// Pending jobs and the shutdown flag, guarded together so a worker can
    /// never miss the last wake-up.
    state: Mutex<State>,

    /// Wakes idle workers.
    condvar: Condvar,
}

struct State {
    jobs: VecDeque<Job>,
    shutdown: bool,
}

impl Injector {
    /// Creates an empty injector.
    pub(crate) fn new() -> Self {
        Injector {
            state: Mutex::new(State {
                jobs: VecDeque::new(),
                shutdown: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Appends a job and wakes one idle worker.
    pub(crate) fn push(&self, job: Job) {
        self.state.lock().jobs.push_back(job);
        self.condvar.notify_one();
    }

    /// Takes the next job, sleeping while the queue is empty.
    ///
    /// Returns `None` once shutdown was requested and every queued job has
    /// been handed out. Jobs queued before shutdown still run, so no
    /// continuation is lost to a pool being dropped.
    pub(crate) fn next(&self) -> Option<Job> {
        let mut state = self.state.lock();

        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }

            if state.shutdown {
                return None;
            }

            self.condvar.wait(&mut state);
        }
    }

    /// Requests shutdown and wakes every idle worker.
    pub(crate) fn shutdown(&self) {
        self.state.lock().shutdown = true;
        self.condvar.notify_all();
    }

    /// Number of jobs waiting for a worker.
    pub(crate) fn pending(&self) -> usize {
        self.state.lock().jobs.len()
    }
}
