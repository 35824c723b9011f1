use std::any::Any;
use std::error::Error;
use std::sync::Arc;

/// A captured failure value.
///
/// Failures are stored inside a completed task and forwarded (cloned)
/// into chained tasks, so they are reference-counted rather than boxed.
pub type Failure = Arc<dyn Error + Send + Sync + 'static>;

/// Wraps a concrete error into a [`Failure`].
///
/// # Examples
///
/// ```rust,ignore
/// task.signal_failure(failure(io::Error::other("disk gone")))?;
/// ```
pub fn failure<E>(err: E) -> Failure
where
    E: Error + Send + Sync + 'static,
{
    Arc::new(err)
}

/// Failure recorded when a user-supplied action or factory panics.
///
/// The panic message is preserved when the payload is a string.
#[derive(Debug, Clone, thiserror::Error)]
#[error("task action panicked: {0}")]
pub struct ActionPanicked(pub String);

/// Converts a caught panic payload into a [`Failure`].
pub(crate) fn panic_failure(payload: Box<dyn Any + Send>) -> Failure {
    let message = if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    };

    Arc::new(ActionPanicked(message))
}

/// Errors returned by task state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    /// A second attempt to complete an already-completed task.
    ///
    /// The first completion always wins; the losing call observes this
    /// error instead of overwriting the recorded outcome.
    #[error("task is already completed")]
    DoubleCompletion,

    /// A second continuation attachment on the same task.
    ///
    /// Each task carries exactly one continuation slot. Attaching twice
    /// is rejected rather than silently dropping the first callback.
    #[error("task already has a continuation attached")]
    ContinuationOccupied,
}

/// Raised when observing a failed task via [`Task::wait`] or by awaiting it.
///
/// The original failure is kept as the single cause, so callers can tell
/// "an awaited dependency failed" apart from errors raised directly in
/// the current call.
///
/// [`Task::wait`]: crate::Task::wait
#[derive(Debug, Clone, thiserror::Error)]
#[error("awaited task failed: {source}")]
pub struct PropagatedFailure {
    #[source]
    pub(crate) source: Failure,
}

impl PropagatedFailure {
    /// Returns the originally captured failure.
    pub fn cause(&self) -> &Failure {
        &self.source
    }
}
