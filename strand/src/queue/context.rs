use super::Kind;

use std::cell::Cell;

thread_local! {
    /// Built-in queue served by the current worker thread.
    ///
    /// Set once when a built-in pool starts the thread and never changed
    /// afterwards. Threads of custom pools and foreign threads keep `None`.
    pub(crate) static CURRENT_QUEUE: Cell<Option<Kind>> = const { Cell::new(None) };
}

/// Marks the current thread as a worker of the given built-in queue.
pub(crate) fn enter_queue(kind: Kind) {
    CURRENT_QUEUE.with(|current| current.set(Some(kind)));
}
