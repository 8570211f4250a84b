use std::fmt;

/// Callback receiving the result of a deferred task.
pub type Continuation<T> = Box<dyn FnOnce(T) + Send + 'static>;

/// Anything that produces one value through a continuation.
///
/// Joins accept any `Deferred` source. Implementations must invoke the
/// continuation exactly once; a continuation that is never invoked blocks
/// every join without a timeout that waits on it.
pub trait Deferred<T>: Send + 'static {
    /// Starts the work and hands its result to `continuation`.
    fn on_complete(self, continuation: Continuation<T>);
}

/// A deferred unit of work producing a `T`.
///
/// Nothing runs until the handle is started, either directly with
/// [`on_complete`](Self::on_complete) or by a join. Starting consumes the
/// handle, so its continuation can fire at most once.
#[must_use = "a handle does nothing until it is started or joined"]
pub struct Handle<T> {
    start: Box<dyn FnOnce(Continuation<T>) + Send + 'static>,
}

/// A deferred unit of work that either produces a `T` or fails with an `E`.
pub type TryHandle<T, E> = Handle<Result<T, E>>;

impl<T: Send + 'static> Handle<T> {
    /// Builds a handle from the function that starts the work.
    ///
    /// `start` receives the continuation and must arrange for it to be
    /// called exactly once.
    pub fn from_fn<F>(start: F) -> Self
    where
        F: FnOnce(Continuation<T>) + Send + 'static,
    {
        Self {
            start: Box::new(start),
        }
    }

    /// Starts the work and calls `continuation` with its result.
    ///
    /// The continuation runs on the thread that completes the work, which
    /// is usually a worker of the handle's queue rather than the caller.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// let greeting = strand::task::spawn(|| "hello");
    ///
    /// greeting.on_complete(|message| {
    ///     assert_eq!(message, "hello");
    /// });
    /// ```
    pub fn on_complete<F>(self, continuation: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        (self.start)(Box::new(continuation));
    }

    /// Starts the work and discards its result.
    pub fn detach(self) {
        self.on_complete(|_| {});
    }
}

impl<T: Send + 'static> Deferred<T> for Handle<T> {
    fn on_complete(self, continuation: Continuation<T>) {
        (self.start)(continuation);
    }
}

impl<T> fmt::Debug for Handle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle").finish_non_exhaustive()
    }
}
