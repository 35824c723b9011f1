//! Task composition combinators.
//!
//! Everything here is built on the [`Task`] primitive and the executor:
//! combinators create tasks and schedule short-lived callbacks; the
//! callbacks complete tasks, which in turn schedule any attached
//! continuation. Chains stay shallow because every step goes back
//! through the executor's queue.

use crate::error::{Failure, failure, panic_failure};
use crate::executor::ExecutorHandle;
use crate::task::Task;

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Schedules `action` on the executor.
///
/// The returned task succeeds once the action returns `Ok` and fails
/// with the action's error otherwise. A panic escaping the action is
/// caught and converted into the task's failure as well.
pub fn run<F>(executor: &ExecutorHandle, action: F) -> Task
where
    F: FnOnce() -> Result<(), Failure> + Send + 'static,
{
    let task = Task::new(executor);
    let settle = task.clone();

    executor.submit(move || {
        let _ = match panic::catch_unwind(AssertUnwindSafe(action)) {
            Ok(Ok(())) => settle.signal_success(),
            Ok(Err(err)) => settle.signal_failure(err),
            Err(payload) => settle.signal_failure(panic_failure(payload)),
        };
    });

    task
}

/// Fan-in over a collection of tasks.
///
/// An empty collection yields an already-succeeded task. Otherwise the
/// result settles once every member has completed, regardless of
/// completion order: it succeeds if every member succeeded, and fails
/// with the first observed member failure otherwise. The result never
/// settles before the slowest member.
pub fn when_all(executor: &ExecutorHandle, tasks: Vec<Task>) -> Task {
    let result = Task::new(executor);

    if tasks.is_empty() {
        let _ = result.signal_success();
        return result;
    }

    let remaining = Arc::new(AtomicUsize::new(tasks.len()));
    let first_failure = Arc::new(Mutex::new(None::<Failure>));

    for member in tasks {
        let barrier = remaining.clone();
        let slot = first_failure.clone();
        let settle = result.clone();
        let observed = member.clone();

        let attached = member.attach_continuation(move || {
            arrive(&barrier, &slot, &settle, observed.failure());
        });

        if let Err(err) = attached {
            // The member's outcome cannot be observed; record the
            // attachment error and still count the member as settled so
            // the barrier resolves.
            arrive(&remaining, &first_failure, &result, Some(failure(err)));
        }
    }

    result
}

/// Marks one `when_all` member as settled, completing the result on the
/// last arrival.
fn arrive(
    remaining: &AtomicUsize,
    first_failure: &Mutex<Option<Failure>>,
    result: &Task,
    member_failure: Option<Failure>,
) {
    if let Some(err) = member_failure {
        let mut slot = first_failure.lock().unwrap();
        if slot.is_none() {
            *slot = Some(err);
        }
    }

    if remaining.fetch_sub(1, Ordering::AcqRel) == 1 {
        let recorded = first_failure.lock().unwrap().take();
        let _ = match recorded {
            Some(err) => result.signal_failure(err),
            None => result.signal_success(),
        };
    }
}

/// Sequential iteration over a lazily-produced sequence of tasks.
///
/// Tasks are pulled one at a time; each is awaited via continuation
/// chaining before the next is requested, so no two members ever run
/// concurrently. The result succeeds once the sequence is exhausted. An
/// `Err` while advancing the sequence fails the result immediately and
/// halts further advancement.
pub fn iterate<I>(executor: &ExecutorHandle, sequence: I) -> Task
where
    I: Iterator<Item = Result<Task, Failure>> + Send + 'static,
{
    let result = Task::new(executor);

    advance(sequence, result.clone());

    result
}

/// Pulls the next task from the sequence, chaining itself as that
/// task's continuation.
///
/// The terminal success signal fires only on the exhaustion arm, so the
/// result completes exactly once.
fn advance<I>(mut sequence: I, result: Task)
where
    I: Iterator<Item = Result<Task, Failure>> + Send + 'static,
{
    match sequence.next() {
        None => {
            let _ = result.signal_success();
        }
        Some(Err(err)) => {
            let _ = result.signal_failure(err);
        }
        Some(Ok(next)) => {
            let fallback = result.clone();

            if let Err(err) = next.attach_continuation(move || advance(sequence, result)) {
                let _ = fallback.signal_failure(failure(err));
            }
        }
    }
}
