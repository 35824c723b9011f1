use crate::error::{Failure, PropagatedFailure, TaskError, failure, panic_failure};
use crate::executor::{ExecutorHandle, WorkItem};
use crate::task::state::Completion;

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Condvar, Mutex};

/// The core awaitable primitive: a single-assignment completion cell.
///
/// A `Task` represents a unit of work that will eventually succeed or
/// fail exactly once. It carries at most one attached continuation,
/// which the owning executor runs exactly once, on or after completion.
///
/// `Task` is a cheap cloneable handle; all clones observe the same cell.
/// Every task is bound at creation to the executor that will run its
/// continuation.
#[derive(Clone)]
pub struct Task {
    inner: Arc<Inner>,
}

struct Inner {
    /// Completion state and continuation slot, under one lock.
    ///
    /// The lock is never held while running user code or while handing
    /// a continuation to the executor.
    cell: Mutex<Cell>,

    /// Released by `complete` to unblock `wait` callers.
    completed: Condvar,

    /// Executor that runs the attached continuation.
    executor: ExecutorHandle,
}

struct Cell {
    completion: Completion,

    /// The single continuation slot, populated only while pending.
    continuation: Option<WorkItem>,
}

impl Task {
    /// Creates a new pending task bound to `executor`.
    pub fn new(executor: &ExecutorHandle) -> Self {
        Self {
            inner: Arc::new(Inner {
                cell: Mutex::new(Cell {
                    completion: Completion::Pending,
                    continuation: None,
                }),
                completed: Condvar::new(),
                executor: executor.clone(),
            }),
        }
    }

    /// Returns `true` once the task has completed. Non-blocking.
    pub fn is_completed(&self) -> bool {
        !self.inner.cell.lock().unwrap().completion.is_pending()
    }

    /// Transitions the task from pending to succeeded.
    ///
    /// Fails with [`TaskError::DoubleCompletion`] if the task has
    /// already completed; the recorded outcome is never overwritten.
    pub fn signal_success(&self) -> Result<(), TaskError> {
        self.complete(Completion::Succeeded)
    }

    /// Transitions the task from pending to failed, capturing `failure`.
    ///
    /// Fails with [`TaskError::DoubleCompletion`] if the task has
    /// already completed.
    pub fn signal_failure(&self, failure: Failure) -> Result<(), TaskError> {
        self.complete(Completion::Failed(failure))
    }

    /// Returns a clone of the captured failure, if the task failed.
    pub fn failure(&self) -> Option<Failure> {
        match &self.inner.cell.lock().unwrap().completion {
            Completion::Failed(failure) => Some(failure.clone()),
            _ => None,
        }
    }

    fn complete(&self, outcome: Completion) -> Result<(), TaskError> {
        let continuation = {
            let mut cell = self.inner.cell.lock().unwrap();

            if !cell.completion.is_pending() {
                return Err(TaskError::DoubleCompletion);
            }

            cell.completion = outcome;
            cell.continuation.take()
        };

        self.inner.completed.notify_all();

        // Hand-off happens outside the cell lock.
        if let Some(item) = continuation {
            self.inner.executor.submit_item(item);
        }

        Ok(())
    }

    /// Blocks the calling thread until the task completes.
    ///
    /// Returns normally if the task succeeded; if it failed, the
    /// captured failure is re-raised wrapped in [`PropagatedFailure`].
    pub fn wait(&self) -> Result<(), PropagatedFailure> {
        let mut cell = self.inner.cell.lock().unwrap();

        while cell.completion.is_pending() {
            cell = self.inner.completed.wait(cell).unwrap();
        }

        match &cell.completion {
            Completion::Succeeded => Ok(()),
            Completion::Failed(failure) => Err(PropagatedFailure {
                source: failure.clone(),
            }),
            Completion::Pending => unreachable!("wait observed a pending completion"),
        }
    }

    /// Registers `callback` to run once, on the executor, after this
    /// task completes.
    ///
    /// If the task has already completed, the callback is handed to the
    /// executor immediately instead of being stored. An ambient snapshot
    /// is captured now and restored around the callback's execution.
    ///
    /// Fails with [`TaskError::ContinuationOccupied`] if a continuation
    /// is already attached; the slot never silently overwrites.
    pub fn attach_continuation<F>(&self, callback: F) -> Result<(), TaskError>
    where
        F: FnOnce() + Send + 'static,
    {
        let item = WorkItem {
            callback: Box::new(callback),
            snapshot: self.inner.executor.capture_snapshot(),
        };

        let mut cell = self.inner.cell.lock().unwrap();

        if cell.completion.is_pending() {
            if cell.continuation.is_some() {
                return Err(TaskError::ContinuationOccupied);
            }

            cell.continuation = Some(item);
            return Ok(());
        }

        drop(cell);
        self.inner.executor.submit_item(item);
        Ok(())
    }

    /// Side-effect chaining: runs `action` after this task completes.
    ///
    /// Returns a task that succeeds once `action` returns `Ok` and
    /// fails with `action`'s error otherwise. A panic escaping the
    /// action is caught and converted into the result task's failure.
    /// The action runs whether this task succeeded or failed.
    pub fn continue_with<F>(&self, action: F) -> Task
    where
        F: FnOnce() -> Result<(), Failure> + Send + 'static,
    {
        let result = Task::new(&self.inner.executor);
        let settle = result.clone();

        let attached = self.attach_continuation(move || {
            let _ = match panic::catch_unwind(AssertUnwindSafe(action)) {
                Ok(Ok(())) => settle.signal_success(),
                Ok(Err(err)) => settle.signal_failure(err),
                Err(payload) => settle.signal_failure(panic_failure(payload)),
            };
        });

        if let Err(err) = attached {
            let _ = result.signal_failure(failure(err));
        }

        result
    }

    /// Monadic sequencing: runs `factory` after this task completes and
    /// forwards the produced task's outcome.
    ///
    /// Returns a task R that settles only after the entire chain
    /// settles: a synchronous `Err` (or panic) from `factory` fails R
    /// directly; otherwise R adopts the inner task's success or failure
    /// once it completes.
    pub fn continue_with_task<F>(&self, factory: F) -> Task
    where
        F: FnOnce() -> Result<Task, Failure> + Send + 'static,
    {
        let result = Task::new(&self.inner.executor);
        let settle = result.clone();

        let attached = self.attach_continuation(move || {
            let next = match panic::catch_unwind(AssertUnwindSafe(factory)) {
                Ok(Ok(next)) => next,
                Ok(Err(err)) => {
                    let _ = settle.signal_failure(err);
                    return;
                }
                Err(payload) => {
                    let _ = settle.signal_failure(panic_failure(payload));
                    return;
                }
            };

            let inner = next.clone();
            let fallback = settle.clone();
            let forwarded = next.attach_continuation(move || {
                let _ = match inner.failure() {
                    Some(err) => settle.signal_failure(err),
                    None => settle.signal_success(),
                };
            });

            if let Err(err) = forwarded {
                let _ = fallback.signal_failure(failure(err));
            }
        });

        if let Err(err) = attached {
            let _ = result.signal_failure(failure(err));
        }

        result
    }
}
