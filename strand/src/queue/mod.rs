//! Execution contexts.
//!
//! A [`Queue`] names where a unit of work runs: the serialized main queue,
//! one of four priority-classed worker pools, or an executor supplied by the
//! caller. Descriptors are cheap to clone and carry no state of their own.
//!
//! The built-in queues are backed by process-wide [`Pool`]s, all created
//! together the first time any of them is resolved and then reused for the
//! lifetime of the process. Their sizes come from the installed
//! [`Config`](crate::config::Config).
//!
//! ## Pool sizing
//!
//! Work may block its own worker on a nested join. That worker keeps its pool
//! slot until the nested join returns, so nesting more joins on one pool than
//! it has workers deadlocks the pool. Joining on [`Queue::Main`] from the main
//! worker itself always deadlocks.

mod context;
mod injector;
mod pool;
mod worker;

pub use pool::{Executor, Job, Pool};

use crate::config;
use context::CURRENT_QUEUE;
use worker::Priority;

use std::fmt;
use std::sync::{Arc, OnceLock};

/// Priority class of a built-in worker pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueueClass {
    /// Work the user is actively waiting on.
    UserInteractive,
    /// Work the user asked for and expects soon. The default class.
    UserInitiated,
    /// Long-running work with visible progress.
    Utility,
    /// Maintenance work nobody is waiting on.
    Background,
}

impl QueueClass {
    /// Every class, from highest to lowest priority.
    pub const ALL: [QueueClass; 4] = [
        QueueClass::UserInteractive,
        QueueClass::UserInitiated,
        QueueClass::Utility,
        QueueClass::Background,
    ];

    pub(crate) fn index(self) -> usize {
        match self {
            QueueClass::UserInteractive => 0,
            QueueClass::UserInitiated => 1,
            QueueClass::Utility => 2,
            QueueClass::Background => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            QueueClass::UserInteractive => "user-interactive",
            QueueClass::UserInitiated => "user-initiated",
            QueueClass::Utility => "utility",
            QueueClass::Background => "background",
        }
    }

    fn priority(self) -> Priority {
        match self {
            QueueClass::UserInteractive | QueueClass::UserInitiated => Priority::Normal,
            QueueClass::Utility => Priority::Low,
            QueueClass::Background => Priority::Lowest,
        }
    }
}

impl fmt::Display for QueueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Descriptor of the place a unit of work runs.
///
/// Resolving a descriptor with [`resolve`](Self::resolve) is idempotent and
/// safe to race from many threads: each built-in variant always resolves to
/// the same pool, and [`Queue::Custom`] hands back the wrapped executor
/// untouched.
#[derive(Clone)]
pub enum Queue {
    /// Serialized queue backed by exactly one worker thread.
    Main,
    /// Pool of the [`QueueClass::UserInteractive`] class.
    UserInteractive,
    /// Pool of the [`QueueClass::UserInitiated`] class.
    UserInitiated,
    /// Pool of the [`QueueClass::Utility`] class.
    Utility,
    /// Pool of the [`QueueClass::Background`] class.
    Background,
    /// Caller-supplied executor, used as is.
    Custom(Arc<dyn Executor>),
}

impl Queue {
    /// Wraps a caller-supplied executor.
    pub fn custom<E>(executor: E) -> Self
    where
        E: Executor,
    {
        Queue::Custom(Arc::new(executor))
    }

    /// Returns the queue of the given priority class.
    pub fn class(class: QueueClass) -> Self {
        match class {
            QueueClass::UserInteractive => Queue::UserInteractive,
            QueueClass::UserInitiated => Queue::UserInitiated,
            QueueClass::Utility => Queue::Utility,
            QueueClass::Background => Queue::Background,
        }
    }

    /// Resolves the descriptor to the executor that runs its work.
    ///
    /// The first resolution of a built-in queue starts the pools of every
    /// built-in queue.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to start the worker threads of a built-in
    /// pool. There is no meaningful way to continue without them.
    pub fn resolve(&self) -> Arc<dyn Executor> {
        match self.kind() {
            Some(kind) => kind.pool().clone(),
            None => match self {
                Queue::Custom(executor) => executor.clone(),
                _ => unreachable!("every built-in queue has a kind"),
            },
        }
    }

    /// Returns the built-in queue whose worker runs the current thread.
    ///
    /// Returns `None` on threads that strand did not start, including the
    /// workers of custom executors.
    pub fn current() -> Option<Queue> {
        CURRENT_QUEUE.with(|current| current.get()).map(Kind::queue)
    }

    fn kind(&self) -> Option<Kind> {
        match self {
            Queue::Main => Some(Kind::Main),
            Queue::UserInteractive => Some(Kind::Class(QueueClass::UserInteractive)),
            Queue::UserInitiated => Some(Kind::Class(QueueClass::UserInitiated)),
            Queue::Utility => Some(Kind::Class(QueueClass::Utility)),
            Queue::Background => Some(Kind::Class(QueueClass::Background)),
            Queue::Custom(_) => None,
        }
    }
}

impl Default for Queue {
    /// Returns the configured default queue.
    fn default() -> Self {
        config::current().default_queue().clone()
    }
}

impl PartialEq for Queue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Queue::Custom(a), Queue::Custom(b)) => Arc::ptr_eq(a, b),
            _ => self.kind().is_some() && self.kind() == other.kind(),
        }
    }
}

impl Eq for Queue {}

impl fmt::Debug for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Queue::Main => f.write_str("Main"),
            Queue::UserInteractive => f.write_str("UserInteractive"),
            Queue::UserInitiated => f.write_str("UserInitiated"),
            Queue::Utility => f.write_str("Utility"),
            Queue::Background => f.write_str("Background"),
            Queue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            Some(kind) => kind.fmt(f),
            None => f.write_str("custom"),
        }
    }
}

/// Built-in queue identity, small enough to live in a thread-local.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Kind {
    Main,
    Class(QueueClass),
}

/// Pools of the built-in queues, indexed by [`Kind::slot`].
///
/// All five start together on the first resolution of any built-in queue.
/// That first resolution can never run on a built-in worker, so no pool
/// inherits the lowered priority of another.
static POOLS: OnceLock<[Arc<Pool>; 5]> = OnceLock::new();

impl Kind {
    const ALL: [Kind; 5] = [
        Kind::Main,
        Kind::Class(QueueClass::UserInteractive),
        Kind::Class(QueueClass::UserInitiated),
        Kind::Class(QueueClass::Utility),
        Kind::Class(QueueClass::Background),
    ];

    fn queue(self) -> Queue {
        match self {
            Kind::Main => Queue::Main,
            Kind::Class(class) => Queue::class(class),
        }
    }

    fn slot(self) -> usize {
        match self {
            Kind::Main => 0,
            Kind::Class(class) => class.index() + 1,
        }
    }

    fn pool(self) -> &'static Arc<Pool> {
        let pools = POOLS.get_or_init(|| Kind::ALL.map(Kind::start));

        &pools[self.slot()]
    }

    fn priority(self) -> Priority {
        match self {
            Kind::Main => Priority::Normal,
            Kind::Class(class) => class.priority(),
        }
    }

    fn start(self) -> Arc<Pool> {
        let config = config::current();

        let threads = match self {
            Kind::Main => 1,
            Kind::Class(class) => config.worker_threads(class),
        };

        let name = format!("{}-{}", config.thread_name_prefix(), self);

        match Pool::start(name, threads, Some(self), self.priority()) {
            Ok(pool) => Arc::new(pool),
            Err(err) => panic!("cannot start the {self} queue: {err}"),
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Main => f.write_str("main"),
            Kind::Class(class) => class.fmt(f),
        }
    }
}
