use segue::{ExecutorBuilder, failure, iterate, run};

use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_iterate_empty_sequence_succeeds() {
    let executor = ExecutorBuilder::new().worker_threads(1).build();
    let handle = executor.handle();

    iterate(&handle, std::iter::empty()).wait().unwrap();
}

#[test]
fn test_iterate_runs_members_strictly_in_sequence() {
    let executor = ExecutorBuilder::new().worker_threads(4).build();
    let handle = executor.handle();

    let active = Arc::new(AtomicUsize::new(0));
    let max_active = Arc::new(AtomicUsize::new(0));
    let order = Arc::new(Mutex::new(Vec::new()));

    let sequence_handle = handle.clone();
    let seq_active = active.clone();
    let seq_max = max_active.clone();
    let seq_order = order.clone();

    let sequence = (0..5).map(move |i| {
        let active = seq_active.clone();
        let max_active = seq_max.clone();
        let order = seq_order.clone();

        Ok(run(&sequence_handle, move || {
            let now = active.fetch_add(1, Ordering::SeqCst) + 1;
            max_active.fetch_max(now, Ordering::SeqCst);

            order.lock().unwrap().push(i);
            thread::sleep(Duration::from_millis(10));

            active.fetch_sub(1, Ordering::SeqCst);
            Ok(())
        }))
    });

    iterate(&handle, sequence).wait().unwrap();

    assert_eq!(
        max_active.load(Ordering::SeqCst),
        1,
        "no two members may run concurrently"
    );
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_iterate_sequence_error_fails_result_and_halts() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let produced = Arc::new(AtomicUsize::new(0));

    let sequence_handle = handle.clone();
    let seq_produced = produced.clone();

    let sequence = (0..5).map(move |i| {
        seq_produced.fetch_add(1, Ordering::SeqCst);

        if i == 2 {
            return Err(failure(io::Error::other("sequence broke")));
        }

        Ok(run(&sequence_handle, || Ok(())))
    });

    let result = iterate(&handle, sequence);

    let err = result.wait().expect_err("sequence error should fail result");
    assert_eq!(err.cause().to_string(), "sequence broke");

    // Advancement halted at the error: items 0, 1 and the failing pull.
    thread::sleep(Duration::from_millis(50));
    assert_eq!(produced.load(Ordering::SeqCst), 3);
}

#[test]
fn test_iterate_with_already_completed_members() {
    let executor = ExecutorBuilder::new().worker_threads(2).build();
    let handle = executor.handle();

    let visited = Arc::new(AtomicUsize::new(0));

    let sequence_handle = handle.clone();
    let seq_visited = visited.clone();

    let sequence = (0..3).map(move |_| {
        let task = segue::Task::new(&sequence_handle);
        task.signal_success().unwrap();
        seq_visited.fetch_add(1, Ordering::SeqCst);
        Ok(task)
    });

    iterate(&handle, sequence).wait().unwrap();

    assert_eq!(visited.load(Ordering::SeqCst), 3);
}
