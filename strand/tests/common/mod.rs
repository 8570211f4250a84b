#![allow(dead_code)]

use strand::{Pool, Queue};

use std::thread;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Routes strand's log events to the test output, filtered by `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A queue backed by a pool of its own, so timing-sensitive tests do not
/// compete with other tests for workers.
pub fn private_queue(name: &str, threads: usize) -> Queue {
    Queue::custom(Pool::new(name, threads).expect("failed to start test pool"))
}

pub fn sleep_ms(ms: u64) {
    thread::sleep(Duration::from_millis(ms));
}
