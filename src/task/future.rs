use crate::error::{PropagatedFailure, failure};
use crate::task::Task;

use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

/// Future adapter for a [`Task`].
///
/// Lets a task compose with any `std::task`-driven executor via native
/// `await` syntax. Resolves to the task's outcome: `Ok(())` on success,
/// or the captured failure wrapped in [`PropagatedFailure`].
pub struct TaskFuture {
    task: Task,

    /// Most recently registered waker, shared with the internal
    /// continuation that fires on completion.
    waker: Arc<Mutex<Option<Waker>>>,

    /// Whether the internal continuation has been attached yet.
    registered: bool,
}

impl IntoFuture for Task {
    type Output = Result<(), PropagatedFailure>;
    type IntoFuture = TaskFuture;

    fn into_future(self) -> TaskFuture {
        TaskFuture {
            task: self,
            waker: Arc::new(Mutex::new(None)),
            registered: false,
        }
    }
}

impl Future for TaskFuture {
    type Output = Result<(), PropagatedFailure>;

    /// Polls the underlying task.
    ///
    /// On the first pending poll, an internal continuation is attached
    /// that wakes the most recently registered waker. The waker is
    /// registered **before** re-checking completion to avoid missed
    /// wake-ups.
    ///
    /// A task is observed either through its continuation slot or
    /// through this future, not both: if a continuation is already
    /// attached, the future resolves to a [`PropagatedFailure`] wrapping
    /// [`TaskError::ContinuationOccupied`].
    ///
    /// [`TaskError::ContinuationOccupied`]: crate::TaskError::ContinuationOccupied
    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        if this.task.is_completed() {
            return Poll::Ready(outcome(&this.task));
        }

        *this.waker.lock().unwrap() = Some(cx.waker().clone());

        if !this.registered {
            this.registered = true;

            let slot = this.waker.clone();
            let attached = this.task.attach_continuation(move || {
                if let Some(waker) = slot.lock().unwrap().take() {
                    waker.wake();
                }
            });

            if let Err(err) = attached {
                return Poll::Ready(Err(PropagatedFailure {
                    source: failure(err),
                }));
            }
        }

        if this.task.is_completed() {
            return Poll::Ready(outcome(&this.task));
        }

        Poll::Pending
    }
}

fn outcome(task: &Task) -> Result<(), PropagatedFailure> {
    match task.failure() {
        Some(source) => Err(PropagatedFailure { source }),
        None => Ok(()),
    }
}
