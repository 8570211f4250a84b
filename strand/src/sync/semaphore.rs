use parking_lot::{Condvar, Mutex};

use std::time::Instant;

/// A counting semaphore.
///
/// [`signal`](Self::signal) adds a permit and wakes one waiter;
/// [`wait`](Self::wait) and [`wait_until`](Self::wait_until) take a permit,
/// blocking the calling thread while none is available.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use strand::sync::Semaphore;
///
/// let done = Arc::new(Semaphore::new(0));
/// let signal = done.clone();
///
/// thread::spawn(move || signal.signal());
/// done.wait();
/// ```
#[derive(Debug, Default)]
pub struct Semaphore {
    /// Available permits.
    permits: Mutex<usize>,

    /// Wakes threads blocked on an empty semaphore.
    condvar: Condvar,
}

impl Semaphore {
    /// Creates a semaphore holding `permits` permits.
    pub fn new(permits: usize) -> Self {
        Self {
            permits: Mutex::new(permits),
            condvar: Condvar::new(),
        }
    }

    /// Releases one permit.
    pub fn signal(&self) {
        *self.permits.lock() += 1;
        self.condvar.notify_one();
    }

    /// Takes one permit, blocking until one is available.
    pub fn wait(&self) {
        let mut permits = self.permits.lock();

        while *permits == 0 {
            self.condvar.wait(&mut permits);
        }

        *permits -= 1;
    }

    /// Takes one permit, blocking until one is available or `deadline`
    /// passes.
    ///
    /// Returns `true` if a permit was taken. A permit that is available when
    /// the wait gives up is still taken.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut permits = self.permits.lock();

        while *permits == 0 {
            if self.condvar.wait_until(&mut permits, deadline).timed_out() {
                break;
            }
        }

        if *permits == 0 {
            return false;
        }

        *permits -= 1;
        true
    }

    /// Takes one permit if one is available, without blocking.
    pub fn try_wait(&self) -> bool {
        let mut permits = self.permits.lock();

        if *permits == 0 {
            return false;
        }

        *permits -= 1;
        true
    }
}
