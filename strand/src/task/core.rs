use super::handle::{Continuation, Deferred, Handle, TryHandle};
use crate::queue::Queue;

/// Wraps `work` into a handle that runs on the default queue.
///
/// The default queue is the one installed through
/// [`config`](crate::config), [`Queue::UserInitiated`] unless configured
/// otherwise. It is looked up when `spawn` is called.
///
/// # Examples
///
/// ```rust,ignore
/// use strand::{join, task};
///
/// let answer = task::spawn(|| 6 * 7);
/// assert_eq!(join::wait(answer), 42);
/// ```
pub fn spawn<T, F>(work: F) -> Handle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    spawn_on(Queue::default(), work)
}

/// Wraps `work` into a handle that runs on `queue`.
///
/// Starting the handle submits `work` to the queue; once it returns, the
/// continuation is invoked with the result on the same worker.
///
/// `work` runs synchronously on its worker and may itself join other
/// handles. While it waits, it keeps its worker busy: nesting more joins on
/// one pool than it has workers deadlocks that pool.
pub fn spawn_on<T, F>(queue: Queue, work: F) -> Handle<T>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    Handle::from_fn(move |continuation: Continuation<T>| {
        queue
            .resolve()
            .execute(Box::new(move || continuation(work())));
    })
}

/// Wraps fallible `work` into a handle that runs on the default queue.
///
/// The continuation receives the `Result` as produced: a value or the error,
/// never both and never neither.
pub fn try_spawn<T, E, F>(work: F) -> TryHandle<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    try_spawn_on(Queue::default(), work)
}

/// Wraps fallible `work` into a handle that runs on `queue`.
pub fn try_spawn_on<T, E, F>(queue: Queue, work: F) -> TryHandle<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce() -> Result<T, E> + Send + 'static,
{
    spawn_on(queue, work)
}

/// Adapts an API that reports completion through a callback.
///
/// Starting the handle runs `start` on `queue` with the continuation; `start`
/// passes it on as the completion callback of the wrapped API. The
/// continuation then runs wherever that API invokes it.
///
/// # Examples
///
/// ```rust,ignore
/// let body = task::bridge(Queue::Utility, move |done| {
///     client.get(url, move |response| done(response));
/// });
///
/// let response = join::wait(body);
/// ```
pub fn bridge<T, F>(queue: Queue, start: F) -> Handle<T>
where
    T: Send + 'static,
    F: FnOnce(Continuation<T>) + Send + 'static,
{
    Handle::from_fn(move |continuation: Continuation<T>| {
        queue
            .resolve()
            .execute(Box::new(move || start(continuation)));
    })
}

/// Defers building a handle until it is started.
///
/// `factory` runs on the thread that starts the returned handle, and the
/// handle it builds is started right away with the same continuation.
pub fn lazy<T, H, F>(factory: F) -> Handle<T>
where
    T: Send + 'static,
    H: Deferred<T>,
    F: FnOnce() -> H + Send + 'static,
{
    Handle::from_fn(move |continuation| factory().on_complete(continuation))
}
