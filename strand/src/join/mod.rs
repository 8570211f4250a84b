//! Blocking joins over deferred tasks.
//!
//! A join starts every task it is given at once, then blocks the calling
//! thread until all of them have produced a value or the join's timeout
//! elapses. Results always come back in the caller's order (positions for
//! lists, keys for maps), never in completion order.
//!
//! Three shapes are supported for every join:
//! - one task: [`Join::one`], [`wait`],
//! - an ordered list: [`Join::all`], [`wait_all`],
//! - a keyed map: [`Join::keyed`], [`wait_keyed`].
//!
//! Forms with a timeout return `Option`s; `None` marks a task that missed
//! the deadline. The `wait*` forms never time out and return plain values.
//!
//! Fallible tasks (`Result<T, E>`) use the `try_*` forms: the first error to
//! complete fails the whole join and every collected value is discarded.
//! Other tasks are not interrupted; they run to completion in the
//! background.
//!
//! ## Blocking
//!
//! Joins block a real thread. Called from a task, they block that task's
//! worker, which stays unavailable to its pool until the join returns.

mod gather;
mod timeout;

pub use timeout::Timeout;

use crate::queue::Queue;
use crate::task::Deferred;
use gather::{Slots, TrySlots, gather};

use std::collections::BTreeMap;

/// Configurable join.
///
/// `Join` fixes the queue that starts the tasks and the timeout, then runs
/// any number of joins with them.
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use strand::join::Join;
/// use strand::task;
///
/// let fast = task::spawn(|| 1);
/// let slow = task::spawn(|| {
///     std::thread::sleep(Duration::from_secs(1));
///     2
/// });
///
/// let results = Join::new()
///     .timeout(Duration::from_millis(200))
///     .all([fast, slow]);
///
/// assert_eq!(results, [Some(1), None]);
/// ```
#[derive(Clone, Debug)]
pub struct Join {
    /// Queue running the jobs that start each task.
    queue: Queue,

    /// Bound on the whole join.
    timeout: Timeout,
}

impl Join {
    /// Creates a join on the default queue, without timeout.
    pub fn new() -> Self {
        Self {
            queue: Queue::default(),
            timeout: Timeout::Infinite,
        }
    }

    /// Starts the tasks from `queue`.
    ///
    /// Tasks still run on their own queues; this only decides where they are
    /// started, which matters for handles built with
    /// [`bridge`](crate::task::bridge) or [`lazy`](crate::task::lazy).
    pub fn queue(mut self, queue: Queue) -> Self {
        self.queue = queue;
        self
    }

    /// Bounds the join.
    ///
    /// Every task shares the same deadline, measured from the start of the
    /// join.
    pub fn timeout(mut self, timeout: impl Into<Timeout>) -> Self {
        self.timeout = timeout.into();
        self
    }

    /// Joins a map of tasks.
    ///
    /// Returns one entry per key; the value is `None` if that key's task
    /// missed the deadline. When the same key appears twice, the later task
    /// replaces the earlier one, which is never started.
    pub fn keyed<K, T, H, I>(&self, tasks: I) -> BTreeMap<K, Option<T>>
    where
        I: IntoIterator<Item = (K, H)>,
        K: Ord + Clone + Send + 'static,
        T: Send + 'static,
        H: Deferred<T>,
    {
        let tasks: BTreeMap<K, H> = tasks.into_iter().collect();
        let slots = Slots::new(tasks.keys().cloned());

        gather::<_, T, _, _>(&self.queue, self.timeout, tasks, slots).into_inner()
    }

    /// Joins a list of tasks, returning their results in list order.
    pub fn all<T, H, I>(&self, tasks: I) -> Vec<Option<T>>
    where
        I: IntoIterator<Item = H>,
        T: Send + 'static,
        H: Deferred<T>,
    {
        self.keyed::<_, T, H, _>(tasks.into_iter().enumerate())
            .into_values()
            .collect()
    }

    /// Joins a single task.
    pub fn one<T, H>(&self, task: H) -> Option<T>
    where
        T: Send + 'static,
        H: Deferred<T>,
    {
        self.all::<T, H, _>([task]).into_iter().next().flatten()
    }

    /// Joins a map of tasks without timeout.
    ///
    /// Any timeout set on this join is ignored.
    pub fn wait_keyed<K, T, H, I>(&self, tasks: I) -> BTreeMap<K, T>
    where
        I: IntoIterator<Item = (K, H)>,
        K: Ord + Clone + Send + 'static,
        T: Send + 'static,
        H: Deferred<T>,
    {
        self.unbounded()
            .keyed::<K, T, H, I>(tasks)
            .into_iter()
            .map(|(key, slot)| (key, resolved(slot)))
            .collect()
    }

    /// Joins a list of tasks without timeout.
    pub fn wait_all<T, H, I>(&self, tasks: I) -> Vec<T>
    where
        I: IntoIterator<Item = H>,
        T: Send + 'static,
        H: Deferred<T>,
    {
        self.unbounded()
            .all::<T, H, I>(tasks)
            .into_iter()
            .map(resolved)
            .collect()
    }

    /// Joins a single task without timeout.
    pub fn wait<T, H>(&self, task: H) -> T
    where
        T: Send + 'static,
        H: Deferred<T>,
    {
        resolved(self.unbounded().one::<T, H>(task))
    }

    /// Joins a map of fallible tasks.
    ///
    /// # Errors
    ///
    /// Returns the first error to complete, in completion order, once every
    /// task has resolved or missed the deadline. No value is returned in
    /// that case, even for tasks that succeeded.
    pub fn try_keyed<K, T, E, H, I>(&self, tasks: I) -> Result<BTreeMap<K, Option<T>>, E>
    where
        I: IntoIterator<Item = (K, H)>,
        K: Ord + Clone + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        let tasks: BTreeMap<K, H> = tasks.into_iter().collect();
        let slots = TrySlots::new(tasks.keys().cloned());

        gather::<_, Result<T, E>, _, _>(&self.queue, self.timeout, tasks, slots).into_result()
    }

    /// Joins a list of fallible tasks, returning their values in list order.
    pub fn try_all<T, E, H, I>(&self, tasks: I) -> Result<Vec<Option<T>>, E>
    where
        I: IntoIterator<Item = H>,
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        self.try_keyed::<_, T, E, H, _>(tasks.into_iter().enumerate())
            .map(|slots| slots.into_values().collect())
    }

    /// Joins a single fallible task, returning its own error unchanged.
    pub fn try_one<T, E, H>(&self, task: H) -> Result<Option<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        self.try_all::<T, E, H, _>([task])
            .map(|slots| slots.into_iter().next().flatten())
    }

    /// Joins a map of fallible tasks without timeout.
    pub fn try_wait_keyed<K, T, E, H, I>(&self, tasks: I) -> Result<BTreeMap<K, T>, E>
    where
        I: IntoIterator<Item = (K, H)>,
        K: Ord + Clone + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        let slots = self.unbounded().try_keyed::<K, T, E, H, I>(tasks)?;

        Ok(slots
            .into_iter()
            .map(|(key, slot)| (key, resolved(slot)))
            .collect())
    }

    /// Joins a list of fallible tasks without timeout.
    pub fn try_wait_all<T, E, H, I>(&self, tasks: I) -> Result<Vec<T>, E>
    where
        I: IntoIterator<Item = H>,
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        let slots = self.unbounded().try_all::<T, E, H, I>(tasks)?;

        Ok(slots.into_iter().map(resolved).collect())
    }

    /// Joins a single fallible task without timeout.
    pub fn try_wait<T, E, H>(&self, task: H) -> Result<T, E>
    where
        T: Send + 'static,
        E: Send + 'static,
        H: Deferred<Result<T, E>>,
    {
        self.unbounded().try_one::<T, E, H>(task).map(resolved)
    }

    fn unbounded(&self) -> Join {
        Join {
            queue: self.queue.clone(),
            timeout: Timeout::Infinite,
        }
    }
}

impl Default for Join {
    fn default() -> Self {
        Self::new()
    }
}

/// Unwraps a slot of a join without timeout.
///
/// Such a join only returns once every task has called its continuation, so
/// an empty slot means a broken [`Deferred`] implementation.
fn resolved<T>(slot: Option<T>) -> T {
    match slot {
        Some(value) => value,
        None => panic!("a join without timeout returned an unresolved task"),
    }
}

/// Waits for one task on the default queue.
///
/// # Examples
///
/// ```rust,ignore
/// let length = strand::join::wait(strand::task::spawn(|| "strand".len()));
/// assert_eq!(length, 6);
/// ```
pub fn wait<T, H>(task: H) -> T
where
    T: Send + 'static,
    H: Deferred<T>,
{
    Join::new().wait(task)
}

/// Waits for a list of tasks on the default queue, in list order.
pub fn wait_all<T, H, I>(tasks: I) -> Vec<T>
where
    I: IntoIterator<Item = H>,
    T: Send + 'static,
    H: Deferred<T>,
{
    Join::new().wait_all(tasks)
}

/// Waits for a map of tasks on the default queue.
pub fn wait_keyed<K, T, H, I>(tasks: I) -> BTreeMap<K, T>
where
    I: IntoIterator<Item = (K, H)>,
    K: Ord + Clone + Send + 'static,
    T: Send + 'static,
    H: Deferred<T>,
{
    Join::new().wait_keyed(tasks)
}

/// Waits for one fallible task on the default queue.
pub fn try_wait<T, E, H>(task: H) -> Result<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    H: Deferred<Result<T, E>>,
{
    Join::new().try_wait(task)
}

/// Waits for a list of fallible tasks on the default queue.
///
/// # Errors
///
/// Returns the first error to complete; see [`Join::try_keyed`].
pub fn try_wait_all<T, E, H, I>(tasks: I) -> Result<Vec<T>, E>
where
    I: IntoIterator<Item = H>,
    T: Send + 'static,
    E: Send + 'static,
    H: Deferred<Result<T, E>>,
{
    Join::new().try_wait_all(tasks)
}

/// Waits for a map of fallible tasks on the default queue.
pub fn try_wait_keyed<K, T, E, H, I>(tasks: I) -> Result<BTreeMap<K, T>, E>
where
    I: IntoIterator<Item = (K, H)>,
    K: Ord + Clone + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    H: Deferred<Result<T, E>>,
{
    Join::new().try_wait_keyed(tasks)
}
