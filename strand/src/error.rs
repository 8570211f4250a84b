use crate::queue::QueueClass;

use std::io;

/// Errors produced by strand itself.
///
/// Failures raised by task bodies never show up here: they travel through
/// fallible handles as the caller's own error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The process-wide configuration was already installed, or it was
    /// frozen to the default by an earlier queue resolution.
    #[error("strand configuration is already installed")]
    AlreadyConfigured,

    /// A pool was configured with no worker threads.
    #[error("worker_threads for {queue} must be > 0")]
    ZeroWorkers { queue: QueueClass },

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker thread `{name}`")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// Convenience alias for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
