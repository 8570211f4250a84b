use super::Timeout;
use crate::queue::Queue;
use crate::sync::Semaphore;
use crate::task::Deferred;

use parking_lot::Mutex;

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

/// Lifecycle of a join.
///
/// `Pending → PartiallyResolved → Resolved | TimedOut | Failed`. `Failed`
/// only exists for fallible joins and wins over the other two terminal
/// states as soon as one error is recorded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Phase {
    Pending,
    PartiallyResolved,
    Resolved,
    TimedOut,
    Failed,
}

/// Receives the outcomes of one join, in completion order.
pub(crate) trait Sink<K, O>: Send + 'static {
    /// Stores the outcome of the task registered under `key`.
    fn record(&mut self, key: K, outcome: O);

    /// Whether an outcome recorded so far fails the whole join.
    fn failed(&self) -> bool {
        false
    }
}

/// One slot per key, empty until that key's task resolves.
pub(crate) struct Slots<K, T> {
    slots: BTreeMap<K, Option<T>>,
}

impl<K: Ord, T> Slots<K, T> {
    pub(crate) fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            slots: keys.into_iter().map(|key| (key, None)).collect(),
        }
    }

    pub(crate) fn into_inner(self) -> BTreeMap<K, Option<T>> {
        self.slots
    }
}

impl<K, T> Sink<K, T> for Slots<K, T>
where
    K: Ord + Send + 'static,
    T: Send + 'static,
{
    fn record(&mut self, key: K, value: T) {
        if let Some(slot) = self.slots.get_mut(&key) {
            *slot = Some(value);
        }
    }
}

/// Slots of a fallible join, plus the first error by completion order.
pub(crate) struct TrySlots<K, T, E> {
    slots: Slots<K, T>,
    error: Option<E>,
}

impl<K: Ord, T, E> TrySlots<K, T, E> {
    pub(crate) fn new(keys: impl IntoIterator<Item = K>) -> Self {
        Self {
            slots: Slots::new(keys),
            error: None,
        }
    }

    /// Fails with the recorded error, discarding every collected value.
    pub(crate) fn into_result(self) -> Result<BTreeMap<K, Option<T>>, E> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.slots.into_inner()),
        }
    }
}

impl<K, T, E> Sink<K, Result<T, E>> for TrySlots<K, T, E>
where
    K: Ord + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
{
    fn record(&mut self, key: K, outcome: Result<T, E>) {
        match outcome {
            Ok(value) => self.slots.record(key, value),
            Err(error) => {
                if self.error.is_none() {
                    self.error = Some(error);
                }
            }
        }
    }

    fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// State of one join, shared with the continuations of its tasks.
///
/// A single mutex guards the whole state, so outcomes are recorded one at a
/// time whatever their key.
struct State<S> {
    /// Collected outcomes; taken by the joining thread when it returns.
    sink: Option<S>,

    /// Outcomes completing after this instant are dropped.
    deadline: Option<Instant>,

    /// Number of outcomes recorded in time.
    resolved: usize,

    /// Number of tasks in the join.
    total: usize,

    /// Whether a recorded outcome failed the join.
    failed: bool,
}

impl<S> State<S> {
    fn resolve<K, O>(&mut self, key: K, outcome: O)
    where
        S: Sink<K, O>,
    {
        // The join already returned; the late outcome is dropped.
        let Some(sink) = self.sink.as_mut() else {
            return;
        };

        if self.deadline.is_some_and(|deadline| Instant::now() > deadline) {
            return;
        }

        sink.record(key, outcome);

        self.resolved += 1;
        self.failed |= sink.failed();

        tracing::trace!(
            phase = ?self.phase(),
            resolved = self.resolved,
            total = self.total,
            "join task resolved"
        );
    }

    fn phase(&self) -> Phase {
        if self.failed {
            Phase::Failed
        } else if self.resolved == self.total {
            Phase::Resolved
        } else if self.sink.is_none() {
            Phase::TimedOut
        } else if self.resolved == 0 {
            Phase::Pending
        } else {
            Phase::PartiallyResolved
        }
    }
}

/// Runs every task concurrently and collects their outcomes into `sink`.
///
/// Each task is started by its own job on `queue`. Its continuation records
/// the outcome and then releases the task's private semaphore. The calling
/// thread blocks on every semaphore in turn until it is released or the
/// shared deadline passes, then closes the join: outcomes arriving after
/// that are dropped.
pub(crate) fn gather<K, O, H, S>(queue: &Queue, timeout: Timeout, tasks: BTreeMap<K, H>, sink: S) -> S
where
    K: Send + 'static,
    O: Send + 'static,
    H: Deferred<O>,
    S: Sink<K, O>,
{
    let total = tasks.len();

    if total == 0 {
        return sink;
    }

    let start = Instant::now();
    let deadline = timeout.deadline_from(start);

    let state = Arc::new(Mutex::new(State {
        sink: Some(sink),
        deadline,
        resolved: 0,
        total,
        failed: false,
    }));

    tracing::trace!(%queue, tasks = total, ?timeout, "join started");

    let executor = queue.resolve();
    let mut signals = Vec::with_capacity(total);

    for (key, task) in tasks {
        let signal = Arc::new(Semaphore::new(0));
        signals.push(Arc::clone(&signal));

        let state = Arc::clone(&state);

        executor.execute(Box::new(move || {
            task.on_complete(Box::new(move |outcome: O| {
                state.lock().resolve(key, outcome);
                signal.signal();
            }));
        }));
    }

    for signal in &signals {
        match deadline {
            Some(deadline) => {
                signal.wait_until(deadline);
            }
            None => signal.wait(),
        }
    }

    let mut state = state.lock();

    let Some(sink) = state.sink.take() else {
        unreachable!("a join is closed only by its own thread");
    };

    let phase = state.phase();

    tracing::trace!(
        %queue,
        ?phase,
        resolved = state.resolved,
        total,
        elapsed = ?start.elapsed(),
        "join finished"
    );

    if phase == Phase::TimedOut {
        tracing::debug!(
            %queue,
            ?timeout,
            missing = total - state.resolved,
            "join timed out"
        );
    }

    sink
}
