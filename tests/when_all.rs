use segue::{ExecutorBuilder, Task, failure, when_all};

use std::io;
use std::thread;
use std::time::{Duration, Instant};

#[test]
fn test_when_all_empty_resolves_immediately() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let handle = executor.handle();

    let result = when_all(&handle, Vec::new());

    assert!(result.is_completed());
    result.wait().unwrap();
}

#[test]
fn test_when_all_waits_for_the_slowest_member() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let tasks: Vec<Task> = (0..3).map(|_| Task::new(&handle)).collect();

    // Stagger completions: 10ms, 30ms, 60ms.
    for (i, task) in tasks.iter().enumerate() {
        let task = task.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(10 + 25 * i as u64));
            task.signal_success().unwrap();
        });
    }

    let start = Instant::now();
    when_all(&handle, tasks).wait().unwrap();

    assert!(
        start.elapsed() >= Duration::from_millis(60),
        "result must not settle before the slowest member"
    );
}

#[test]
fn test_when_all_order_independent() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let tasks: Vec<Task> = (0..3).map(|_| Task::new(&handle)).collect();
    let result = when_all(&handle, tasks.clone());

    // Complete in reverse order.
    for task in tasks.iter().rev() {
        task.signal_success().unwrap();
    }

    result.wait().unwrap();
}

#[test]
fn test_when_all_propagates_first_observed_failure() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let failing = Task::new(&handle);
    let slow = Task::new(&handle);

    let result = when_all(&handle, vec![failing.clone(), slow.clone()]);

    failing
        .signal_failure(failure(io::Error::other("member down")))
        .unwrap();

    // A member failure must not settle the barrier early.
    thread::sleep(Duration::from_millis(50));
    assert!(!result.is_completed());

    slow.signal_success().unwrap();

    let err = result.wait().expect_err("member failure should propagate");
    assert_eq!(err.cause().to_string(), "member down");
}

#[test]
fn test_when_all_with_already_completed_members() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let tasks: Vec<Task> = (0..4).map(|_| Task::new(&handle)).collect();
    for task in &tasks {
        task.signal_success().unwrap();
    }

    when_all(&handle, tasks).wait().unwrap();
}
