use crate::error::Failure;

/// Completion state of a task cell.
///
/// A cell leaves `Pending` at most once; the other two states are
/// terminal and carry the recorded outcome.
pub(crate) enum Completion {
    /// The task has not completed yet.
    Pending,

    /// The task completed successfully.
    Succeeded,

    /// The task completed with the captured failure.
    Failed(Failure),
}

impl Completion {
    /// Returns `true` while the cell has not completed.
    pub(crate) fn is_pending(&self) -> bool {
        matches!(self, Completion::Pending)
    }
}
