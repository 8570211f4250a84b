//! Deferred tasks.
//!
//! A [`Handle`] is a unit of work that has not started yet. It exposes one
//! operation, [`on_complete`](Handle::on_complete): the handle submits its
//! work to its queue and calls the continuation with the result, exactly
//! once, on the worker that produced it.
//!
//! Handles are produced by:
//! - [`spawn`] / [`spawn_on`] for plain closures,
//! - [`try_spawn`] / [`try_spawn_on`] for closures returning `Result`,
//! - [`bridge`] for APIs that report completion through a callback,
//! - [`lazy`] for handles that should only be built once they are started.
//!
//! Joining one or many handles is the job of the [`join`](crate::join)
//! module.

mod core;
mod handle;

pub use self::core::{bridge, lazy, spawn, spawn_on, try_spawn, try_spawn_on};
pub use handle::{Continuation, Deferred, Handle, TryHandle};
