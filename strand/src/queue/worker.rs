use super::Kind;
use super::context::enter_queue;
use super::injector::Injector;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// OS scheduling priority applied to a worker thread at startup.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Priority {
    Normal,
    Low,
    Lowest,
}

impl Priority {
    /// Sets the priority of the calling thread.
    ///
    /// The level is absolute, not relative to the thread that started the
    /// worker. Best effort: failures are ignored, and platforms without
    /// per-thread priorities keep running at whatever level they inherited.
    fn apply(self) {
        imp::set(self);
    }
}

#[cfg(target_os = "linux")]
mod imp {
    use super::Priority;

    pub(super) fn nice(priority: Priority) -> libc::c_int {
        match priority {
            Priority::Normal => 0,
            Priority::Low => 5,
            Priority::Lowest => 10,
        }
    }

    pub(super) fn set(priority: Priority) {
        // On Linux, `who == 0` with PRIO_PROCESS targets the calling thread only.
        unsafe {
            libc::setpriority(libc::PRIO_PROCESS, 0, nice(priority));
        }
    }
}

#[cfg(windows)]
mod imp {
    use super::Priority;

    use windows_sys::Win32::System::Threading::{
        GetCurrentThread, SetThreadPriority, THREAD_PRIORITY_BELOW_NORMAL, THREAD_PRIORITY_LOWEST,
        THREAD_PRIORITY_NORMAL,
    };

    pub(super) fn set(priority: Priority) {
        let level = match priority {
            Priority::Normal => THREAD_PRIORITY_NORMAL,
            Priority::Low => THREAD_PRIORITY_BELOW_NORMAL,
            Priority::Lowest => THREAD_PRIORITY_LOWEST,
        };

        unsafe {
            SetThreadPriority(GetCurrentThread(), level);
        }
    }
}

#[cfg(not(any(target_os = "linux", windows)))]
mod imp {
    use super::Priority;

    pub(super) fn set(_priority: Priority) {}
}

/// A worker thread of a pool.
///
/// Workers pull jobs from the shared injector in a loop and run each one to
/// completion. A job that blocks (for example on a nested join) keeps the
/// worker busy for as long as it blocks.
pub(crate) struct Worker {
    /// Thread name, used in log events.
    name: String,

    /// Built-in queue this worker serves, if any.
    kind: Option<Kind>,

    /// Priority applied when the thread starts.
    priority: Priority,

    /// Queue shared with the other workers of the pool.
    injector: Arc<Injector>,
}

impl Worker {
    pub(crate) fn new(
        name: String,
        kind: Option<Kind>,
        priority: Priority,
        injector: Arc<Injector>,
    ) -> Self {
        Self {
            name,
            kind,
            priority,
            injector,
        }
    }

    /// Runs the worker loop until the pool shuts down.
    ///
    /// A panicking job is caught and logged so that the worker survives and
    /// the pool keeps its size.
    pub(crate) fn run(self) {
        if let Some(kind) = self.kind {
            enter_queue(kind);
        }

        self.priority.apply();

        while let Some(job) = self.injector.next() {
            if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
                let message = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("<non-string panic payload>");

                tracing::error!(worker = %self.name, panic = message, "job panicked");
            }
        }

        tracing::trace!(worker = %self.name, "worker exiting");
    }
}
