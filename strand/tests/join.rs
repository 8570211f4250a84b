mod common;

use common::{init_tracing, private_queue, sleep_ms};
use strand::{Handle, Join, Queue, join, task};

use parking_lot::Mutex;
use proptest::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

fn to_string(number: u64) -> Handle<String> {
    task::spawn(move || {
        sleep_ms(100 - number * 10);
        number.to_string()
    })
}

#[test]
fn test_wait_single_task() {
    assert_eq!(join::wait(task::spawn(|| 42)), 42);
}

#[test]
fn test_wait_all_preserves_order() {
    init_tracing();

    let numbers: Vec<u64> = (0..10).collect();

    // Later numbers finish first.
    let results = join::wait_all(numbers.iter().copied().map(to_string));

    let expected: Vec<String> = numbers.iter().map(u64::to_string).collect();
    assert_eq!(results, expected);
}

#[test]
fn test_wait_all_runs_in_parallel() {
    let queue = private_queue("parallel", 4);
    let started = Instant::now();

    let results = Join::new().queue(queue.clone()).wait_all((0..4).map(|i| {
        task::spawn_on(queue.clone(), move || {
            sleep_ms(200);
            i
        })
    }));

    assert_eq!(results, vec![0, 1, 2, 3]);
    assert!(
        started.elapsed() < Duration::from_millis(700),
        "tasks ran one after another: {:?}",
        started.elapsed()
    );
}

#[test]
fn test_wait_keyed_preserves_keys() {
    let tasks: BTreeMap<u64, Handle<String>> = (0..10).map(|n| (n, to_string(n))).collect();

    let results = join::wait_keyed(tasks);

    assert_eq!(results.len(), 10);
    for (key, value) in &results {
        assert_eq!(*value, key.to_string());
    }
}

#[test]
fn test_wait_keyed_with_string_keys() {
    let results = join::wait_keyed([
        ("profile", task::spawn(|| 1)),
        ("index", task::spawn(|| 2)),
        ("style", task::spawn(|| 3)),
    ]);

    assert_eq!(results["profile"], 1);
    assert_eq!(results["index"], 2);
    assert_eq!(results["style"], 3);
}

#[test]
fn test_duplicate_keys_keep_the_last_task() {
    let started = Arc::new(AtomicUsize::new(0));

    let counted = |value: i32| {
        let started = started.clone();
        task::spawn(move || {
            started.fetch_add(1, Ordering::SeqCst);
            value
        })
    };

    let results = join::wait_keyed([("a", counted(1)), ("a", counted(2))]);

    assert_eq!(results.len(), 1);
    assert_eq!(results["a"], 2);
    assert_eq!(started.load(Ordering::SeqCst), 1);
}

#[test]
fn test_empty_joins_return_immediately() {
    let results: Vec<i32> = join::wait_all(Vec::<Handle<i32>>::new());
    assert!(results.is_empty());

    let results: BTreeMap<u8, i32> = join::wait_keyed(Vec::<(u8, Handle<i32>)>::new());
    assert!(results.is_empty());
}

#[test]
fn test_sequential_awaits_chain_values() {
    init_tracing();

    let create = || {
        task::spawn(|| {
            sleep_ms(50);
            String::new()
        })
    };

    let append = |head: String, tail: &'static str| {
        task::spawn(move || {
            sleep_ms(50);
            head + tail
        })
    };

    let steps = Arc::new(Mutex::new(Vec::new()));
    let observed = steps.clone();

    let url = join::wait(task::spawn(move || {
        let mut s = join::wait(create());
        observed.lock().push(s.clone());

        s = join::wait(append(s, "https://"));
        observed.lock().push(s.clone());

        s = join::wait(append(s, "swift"));
        observed.lock().push(s.clone());

        s = join::wait(append(s, ".org"));
        observed.lock().push(s.clone());

        s
    }));

    assert_eq!(url, "https://swift.org");
    assert_eq!(
        *steps.lock(),
        vec!["", "https://", "https://swift", "https://swift.org"]
    );
}

#[test]
fn test_serial_awaits_inside_loop() {
    let numbers: Vec<u64> = (0..10).collect();
    let inputs = numbers.clone();

    let results = join::wait(task::spawn_on(Queue::Utility, move || {
        let mut results = Vec::new();
        for number in inputs {
            results.push(join::wait(task::spawn(move || number.to_string())));
        }
        results
    }));

    let expected: Vec<String> = numbers.iter().map(u64::to_string).collect();
    assert_eq!(results, expected);
}

#[test]
fn test_parallel_join_nested_in_task() {
    let results = join::wait(task::spawn_on(Queue::Background, || {
        join::wait_all((0..10).map(|n| {
            task::spawn(move || {
                sleep_ms(20);
                n * 2
            })
        }))
    }));

    assert_eq!(results, (0..10).map(|n| n * 2).collect::<Vec<_>>());
}

#[test]
fn test_join_on_other_queue() {
    let results = Join::new()
        .queue(Queue::Utility)
        .wait_all([
            task::spawn_on(Queue::Background, Queue::current),
            task::spawn_on(Queue::Main, Queue::current),
        ]);

    assert_eq!(results, vec![Some(Queue::Background), Some(Queue::Main)]);
}

#[test]
fn test_wait_ignores_configured_timeout() {
    let join = Join::new().timeout(Duration::from_millis(10));

    let value = join.wait(task::spawn(|| {
        sleep_ms(100);
        "late"
    }));

    assert_eq!(value, "late");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_wait_all_matches_submission_order(
        jobs in proptest::collection::vec((any::<u32>(), 0u64..20), 0..12)
    ) {
        let handles = jobs.iter().map(|&(value, delay)| {
            task::spawn(move || {
                sleep_ms(delay);
                value
            })
        });

        let results = join::wait_all(handles);
        let expected: Vec<u32> = jobs.iter().map(|&(value, _)| value).collect();

        prop_assert_eq!(results, expected);
    }
}
