mod common;

use common::{init_tracing, private_queue, sleep_ms};
use strand::sync::Semaphore;
use strand::{Join, TryHandle, join, task};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq, Eq)]
enum TestError {
    NotFound(&'static str),
    Refused,
}

fn delayed(ms: u64, outcome: Result<u32, TestError>) -> TryHandle<u32, TestError> {
    task::try_spawn(move || {
        sleep_ms(ms);
        outcome
    })
}

#[test]
fn test_try_wait_returns_value() {
    assert_eq!(join::try_wait(delayed(10, Ok(7))), Ok(7));
}

#[test]
fn test_try_wait_reraises_error() {
    init_tracing();

    let will_fail = task::try_spawn(|| -> Result<(), TestError> {
        sleep_ms(50);
        Err(TestError::Refused)
    });

    assert_eq!(join::try_wait(will_fail), Err(TestError::Refused));
}

#[test]
fn test_try_wait_inside_fallible_task() {
    let will_fail = delayed(20, Err(TestError::NotFound("random.txt")));

    let outer = task::try_spawn(move || {
        let value = join::try_wait(will_fail)?;
        Ok::<_, TestError>(value + 1)
    });

    assert_eq!(
        join::try_wait(outer),
        Err(TestError::NotFound("random.txt"))
    );
}

#[test]
fn test_try_wait_all_collects_values() {
    let results = join::try_wait_all([delayed(30, Ok(1)), delayed(10, Ok(2)), delayed(20, Ok(3))]);

    assert_eq!(results, Ok(vec![1, 2, 3]));
}

#[test]
fn test_one_failure_fails_the_join() {
    init_tracing();

    // The failing task completes last; the others succeed long before.
    let results = join::try_wait_all([
        delayed(10, Ok(1)),
        delayed(10, Ok(2)),
        delayed(150, Err(TestError::Refused)),
        delayed(10, Ok(4)),
    ]);

    assert_eq!(results, Err(TestError::Refused));
}

#[test]
fn test_first_error_by_completion_order_wins() {
    let queue = private_queue("fallible-order", 4);

    let on_queue = |ms: u64, outcome: Result<u32, TestError>| {
        task::try_spawn_on(queue.clone(), move || {
            sleep_ms(ms);
            outcome
        })
    };

    let results = Join::new().queue(queue.clone()).try_wait_keyed([
        ("a", on_queue(200, Err(TestError::NotFound("a")))),
        ("b", on_queue(20, Err(TestError::NotFound("b")))),
        ("c", on_queue(5, Ok(3))),
    ]);

    assert_eq!(results, Err(TestError::NotFound("b")));
}

#[test]
fn test_failure_does_not_abort_siblings() {
    let finished = Arc::new(AtomicUsize::new(0));
    let done = Arc::new(Semaphore::new(0));

    let sibling = |ms: u64| {
        let finished = finished.clone();
        let done = done.clone();

        task::try_spawn(move || {
            sleep_ms(ms);
            finished.fetch_add(1, Ordering::SeqCst);
            done.signal();
            Ok::<u32, TestError>(0)
        })
    };

    let results = join::try_wait_all([
        task::try_spawn(|| Err(TestError::Refused)),
        sibling(50),
        sibling(100),
    ]);

    assert_eq!(results, Err(TestError::Refused));

    // Without timeout the join only returns after every sibling completed.
    assert_eq!(finished.load(Ordering::SeqCst), 2);
    assert!(done.try_wait());
    assert!(done.try_wait());
}

#[test]
fn test_fallible_timeout_keeps_absent_slots() {
    let queue = private_queue("fallible-timeout", 4);

    let results = Join::new()
        .queue(queue.clone())
        .timeout(Duration::from_millis(150))
        .try_all([
            task::try_spawn_on(queue.clone(), || Ok::<_, TestError>(1)),
            task::try_spawn_on(queue.clone(), || {
                sleep_ms(400);
                Ok(2)
            }),
        ]);

    assert_eq!(results, Ok(vec![Some(1), None]));
}

#[test]
fn test_late_error_is_discarded() {
    let queue = private_queue("fallible-late", 4);

    let started = Instant::now();
    let results = Join::new()
        .queue(queue.clone())
        .timeout(Duration::from_millis(100))
        .try_keyed([
            ("ok", task::try_spawn_on(queue.clone(), || Ok(1))),
            (
                "late",
                task::try_spawn_on(queue.clone(), || {
                    sleep_ms(300);
                    Err(TestError::Refused)
                }),
            ),
        ]);

    assert!(started.elapsed() < Duration::from_millis(300));

    let results = results.unwrap();
    assert_eq!(results["ok"], Some(1));
    assert_eq!(results["late"], None);
}

#[test]
fn test_error_before_deadline_fails_timed_join() {
    let queue = private_queue("fallible-error", 4);

    let results = Join::new()
        .queue(queue.clone())
        .timeout(Duration::from_millis(200))
        .try_all([
            task::try_spawn_on(queue.clone(), || Err(TestError::NotFound("early"))),
            task::try_spawn_on(queue.clone(), || {
                sleep_ms(500);
                Ok(2)
            }),
        ]);

    assert_eq!(results, Err(TestError::NotFound("early")));
}

#[test]
fn test_try_one_surfaces_own_error() {
    let join = Join::new();

    assert_eq!(join.try_one(delayed(5, Ok(9))), Ok(Some(9)));
    assert_eq!(
        join.try_one(delayed(5, Err(TestError::NotFound("one")))),
        Err(TestError::NotFound("one"))
    );
}
