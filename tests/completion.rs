use segue::{ExecutorBuilder, Task, TaskError, failure};

use std::io;
use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

#[test]
fn test_new_task_is_pending() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    assert!(!task.is_completed());
    assert!(task.failure().is_none());
}

#[test]
fn test_first_completion_wins() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    assert!(task.signal_success().is_ok());
    assert!(task.is_completed());

    assert_eq!(task.signal_success(), Err(TaskError::DoubleCompletion));
    assert_eq!(
        task.signal_failure(failure(io::Error::other("late"))),
        Err(TaskError::DoubleCompletion)
    );
}

#[test]
fn test_failure_is_never_overwritten() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    task.signal_failure(failure(io::Error::other("original")))
        .unwrap();

    assert_eq!(task.signal_success(), Err(TaskError::DoubleCompletion));

    let captured = task.failure().expect("failure should be recorded");
    assert_eq!(captured.to_string(), "original");
}

#[test]
fn test_wait_on_succeeded_task_returns() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    task.signal_success().unwrap();

    assert!(task.wait().is_ok());
}

#[test]
fn test_wait_on_failed_task_wraps_original_error() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    task.signal_failure(failure(io::Error::other("boom"))).unwrap();

    let err = task.wait().expect_err("wait should raise");
    assert_eq!(err.cause().to_string(), "boom");
    assert!(err.to_string().contains("boom"));
}

#[test]
fn test_wait_blocks_until_completion() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    let completer = task.clone();
    let signaller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        completer.signal_success().unwrap();
    });

    let start = std::time::Instant::now();
    task.wait().unwrap();

    assert!(start.elapsed() >= Duration::from_millis(50));
    signaller.join().unwrap();
}

#[test]
fn test_concurrent_completion_has_exactly_one_winner() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let task = Task::new(&executor.handle());

    let barrier = Arc::new(Barrier::new(2));

    let contenders: Vec<_> = (0..2)
        .map(|_| {
            let task = task.clone();
            let barrier = barrier.clone();

            thread::spawn(move || {
                barrier.wait();
                task.signal_success()
            })
        })
        .collect();

    let results: Vec<_> = contenders
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| **r == Err(TaskError::DoubleCompletion))
            .count(),
        1
    );
}
