use super::Kind;
use super::injector::Injector;
use super::worker::{Priority, Worker};
use crate::error::{Error, Result};

use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A unit of work submitted to an [`Executor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// A native execution context.
///
/// Anything that can run a boxed closure somewhere can back a
/// [`Queue::Custom`](super::Queue::Custom). Implementations must eventually
/// run every job they accept; a dropped job leaves whatever waits on it
/// blocked forever.
pub trait Executor: Send + Sync + 'static {
    /// Submits a job for execution.
    fn execute(&self, job: Job);
}

/// Fixed-size pool of worker threads.
///
/// The built-in queues are backed by pools started on demand, and callers can
/// start their own to wrap in [`Queue::Custom`](super::Queue::Custom).
///
/// Dropping a pool lets its workers drain the jobs already queued, then joins
/// them.
///
/// # Examples
///
/// ```rust,ignore
/// let pool = Pool::new("io", 2)?;
/// let queue = Queue::custom(pool);
/// ```
pub struct Pool {
    /// Name prefix shared by the worker threads.
    name: String,

    /// Queue shared by all workers.
    injector: Arc<Injector>,

    /// Join handles of the worker threads.
    handles: Vec<JoinHandle<()>>,
}

impl Pool {
    /// Starts a pool of `threads` workers named `<name>-<n>`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Spawn`] if the OS refuses to start a thread. Threads
    /// started before the failure are shut down again.
    ///
    /// # Panics
    ///
    /// Panics if `threads == 0`.
    pub fn new(name: impl Into<String>, threads: usize) -> Result<Self> {
        assert!(threads > 0, "worker_threads must be > 0");

        Self::start(name.into(), threads, None, Priority::Normal)
    }

    pub(crate) fn start(
        name: String,
        threads: usize,
        kind: Option<Kind>,
        priority: Priority,
    ) -> Result<Self> {
        let injector = Arc::new(Injector::new());

        let mut pool = Self {
            name,
            injector,
            handles: Vec::with_capacity(threads),
        };

        for id in 0..threads {
            let thread_name = if threads == 1 {
                pool.name.clone()
            } else {
                format!("{}-{id}", pool.name)
            };

            let worker = Worker::new(thread_name.clone(), kind, priority, pool.injector.clone());

            let handle = thread::Builder::new()
                .name(thread_name.clone())
                .spawn(move || worker.run())
                .map_err(|source| Error::Spawn {
                    name: thread_name,
                    source,
                })?;

            pool.handles.push(handle);
        }

        tracing::debug!(pool = %pool.name, threads, ?priority, "pool started");

        Ok(pool)
    }

    /// Name prefix of the worker threads.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of worker threads.
    pub fn worker_threads(&self) -> usize {
        self.handles.len()
    }

    /// Number of submitted jobs no worker has picked up yet.
    pub fn pending(&self) -> usize {
        self.injector.pending()
    }
}

impl Executor for Pool {
    fn execute(&self, job: Job) {
        self.injector.push(job);
    }
}

impl fmt::Debug for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pool")
            .field("name", &self.name)
            .field("worker_threads", &self.handles.len())
            .finish()
    }
}

impl Drop for Pool {
    /// Shuts the pool down.
    ///
    /// 1. Signals the workers to exit once the queue is drained
    /// 2. Joins every worker, except the calling thread when the last
    ///    reference to the pool is released by one of its own jobs
    fn drop(&mut self) {
        self.injector.shutdown();

        let current = thread::current().id();

        for handle in self.handles.drain(..) {
            if handle.thread().id() != current {
                let _ = handle.join();
            }
        }

        tracing::debug!(pool = %self.name, "pool stopped");
    }
}
