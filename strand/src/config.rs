//! Process-wide configuration.
//!
//! Strand reads its settings once, the first time a built-in queue or the
//! default queue is needed. Applications that want something other than the
//! defaults install a [`Config`] at startup, before any task is spawned:
//!
//! ```rust,ignore
//! use strand::config::{self, Config};
//! use strand::{Queue, QueueClass};
//!
//! fn main() -> strand::Result<()> {
//!     config::install(
//!         Config::builder()
//!             .default_queue(Queue::Utility)
//!             .worker_threads(QueueClass::Background, 2)
//!             .build()?,
//!     )?;
//!
//!     // spawn and join as usual
//!     Ok(())
//! }
//! ```
//!
//! Once anything has read the configuration, it is frozen for the lifetime
//! of the process and [`install`] fails with
//! [`Error::AlreadyConfigured`](crate::Error::AlreadyConfigured).

use crate::error::{Error, Result};
use crate::queue::{Queue, QueueClass};

use std::sync::OnceLock;
use std::thread;

/// Lower bound on the default size of a priority-class pool.
const MIN_DEFAULT_WORKERS: usize = 4;

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Installs the process-wide configuration.
///
/// # Errors
///
/// Returns [`Error::AlreadyConfigured`] if a configuration was installed
/// before, or if the default one was already frozen by a first use.
pub fn install(config: Config) -> Result<()> {
    CONFIG.set(config).map_err(|_| Error::AlreadyConfigured)?;

    tracing::debug!(config = ?current(), "strand configured");

    Ok(())
}

/// Returns the process-wide configuration, freezing the default one if
/// nothing was installed yet.
pub fn current() -> &'static Config {
    CONFIG.get_or_init(Config::default)
}

/// Settings shared by every queue and join in the process.
#[derive(Clone, Debug)]
pub struct Config {
    /// Queue used when a call does not name one.
    default_queue: Queue,

    /// Pool size per priority class, highest priority first.
    worker_threads: [usize; 4],

    /// Prefix of every worker thread name.
    thread_name_prefix: String,
}

impl Config {
    /// Starts building a configuration from the defaults.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Queue used by `spawn`, `try_spawn` and joins that do not name one.
    pub fn default_queue(&self) -> &Queue {
        &self.default_queue
    }

    /// Size of the pool backing the given priority class.
    pub fn worker_threads(&self, class: QueueClass) -> usize {
        self.worker_threads[class.index()]
    }

    /// Prefix of every worker thread name.
    pub fn thread_name_prefix(&self) -> &str {
        &self.thread_name_prefix
    }
}

impl Default for Config {
    /// Default settings.
    ///
    /// - default queue: [`Queue::UserInitiated`]
    /// - pool sizes: the number of logical CPUs (at least four) for every
    ///   class but [`QueueClass::Background`], which gets four
    /// - thread names: `strand-<queue>-<n>`
    fn default() -> Self {
        let parallelism = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
            .max(MIN_DEFAULT_WORKERS);

        Self {
            default_queue: Queue::UserInitiated,
            worker_threads: [parallelism, parallelism, parallelism, MIN_DEFAULT_WORKERS],
            thread_name_prefix: String::from("strand"),
        }
    }
}

/// Builder for [`Config`].
///
/// # Examples
///
/// ```rust,ignore
/// let config = Config::builder()
///     .worker_threads(QueueClass::UserInitiated, 8)
///     .thread_name_prefix("app")
///     .build()?;
/// ```
#[derive(Clone, Debug)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Creates a builder holding the default settings.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Sets the queue used when a call does not name one.
    pub fn default_queue(mut self, queue: Queue) -> Self {
        self.config.default_queue = queue;
        self
    }

    /// Sets the number of workers of one priority class.
    ///
    /// The main queue is always served by exactly one thread.
    pub fn worker_threads(mut self, class: QueueClass, n: usize) -> Self {
        self.config.worker_threads[class.index()] = n;
        self
    }

    /// Sets the prefix of worker thread names.
    pub fn thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    /// Validates and returns the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ZeroWorkers`] if a class was given no workers.
    pub fn build(self) -> Result<Config> {
        for class in QueueClass::ALL {
            if self.config.worker_threads(class) == 0 {
                return Err(Error::ZeroWorkers { queue: class });
            }
        }

        Ok(self.config)
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
