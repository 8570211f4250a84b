//! Blocking synchronization primitives.
//!
//! Every wait in strand is a real thread block. Joins give each task a private
//! [`Semaphore`], released exactly once by that task's continuation, and
//! block the joining thread on it until it is released or the join's
//! deadline passes.

mod semaphore;

pub use semaphore::Semaphore;
