//! # Strand
//!
//! **Strand** lets code written in a plain synchronous style dispatch work onto
//! named execution contexts and block-wait on the results, one task at a time
//! or as a fan-out join with an optional timeout.
//!
//! It is built on ordinary OS threads: a serialized main queue and four
//! priority-classed worker pools, all started on demand. Every wait is a real
//! thread block on a counting semaphore, released exactly once by the task it
//! waits for. There are no futures and no reactor.
//!
//! - **Deferred tasks**: [`task::spawn`] wraps a closure into a [`Handle`]
//!   that runs it on a [`Queue`] once started
//! - **Joins**: [`join::wait`], [`join::wait_all`] and [`join::wait_keyed`]
//!   start tasks concurrently and collect their results in the caller's order
//! - **Timeouts**: [`join::Join`] bounds a join; tasks that miss the deadline
//!   come back as `None` and keep running in the background
//! - **Fallible tasks**: [`task::try_spawn`] and the `try_*` joins fail a
//!   whole join with the first error to complete
//! - **Callback bridge**: [`task::bridge`] turns any completion-callback API
//!   into a handle that can take part in joins
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strand::{join, task};
//!
//! let append = |head: String, tail: &'static str| task::spawn(move || head + tail);
//!
//! let url = join::wait(task::spawn(|| {
//!     let mut s = join::wait(task::spawn(String::new));
//!     s = join::wait(append(s, "https://"));
//!     s = join::wait(append(s, "rust-lang"));
//!     join::wait(append(s, ".org"))
//! }));
//!
//! assert_eq!(url, "https://rust-lang.org");
//! ```
//!
//! ## Blocking inside tasks
//!
//! A task may join other tasks; doing so blocks its worker until the nested
//! join returns. Each pool has a fixed number of workers (see [`config`]), so
//! more nested joins in flight on one pool than it has workers deadlock it.
//! Joining on [`Queue::Main`] from the main queue itself always deadlocks.
//!
//! ## Modules
//!
//! - [`queue`] — Execution contexts and worker pools
//! - [`task`] — Deferred tasks and the callback bridge
//! - [`join`] — Blocking joins, with or without timeout
//! - [`sync`] — The counting semaphore joins wait on
//! - [`config`] — Process-wide settings, installed once at startup

mod error;

pub mod config;
pub mod join;
pub mod queue;
pub mod sync;
pub mod task;

pub use error::{Error, Result};
pub use join::{Join, Timeout};
pub use queue::{Executor, Job, Pool, Queue, QueueClass};
pub use task::{Continuation, Deferred, Handle, TryHandle};
