use crate::executor::core::Shared;
use crate::executor::queue::WorkItem;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

/// A worker thread in the executor.
///
/// Each worker runs an identical loop: dequeue the next work item
/// (blocking while the queue is empty), restore the item's ambient
/// snapshot if present, execute the callback, repeat. The loop exits
/// once the queue reports closed.
pub(crate) struct Worker {
    /// Unique identifier of the worker.
    id: usize,

    /// Queue and context facility shared with the executor.
    shared: Arc<Shared>,
}

impl Worker {
    pub(crate) fn new(id: usize, shared: Arc<Shared>) -> Self {
        Self { id, shared }
    }

    /// Runs the worker loop until shutdown.
    pub(crate) fn run(&self) {
        while let Some(item) = self.shared.queue.pop() {
            self.execute(item);
        }

        tracing::debug!(worker = self.id, "worker exiting");
    }

    /// Executes one work item.
    ///
    /// A panic escaping the callback is caught and logged so that one
    /// misbehaving callback cannot take the worker thread down with it.
    fn execute(&self, item: WorkItem) {
        tracing::trace!(worker = self.id, "executing work item");

        let WorkItem { callback, snapshot } = item;
        let facility = self.shared.context.as_ref();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            match (facility, snapshot) {
                (Some(facility), Some(snapshot)) => facility.run_with(&snapshot, callback),
                _ => callback(),
            }
        }));

        if outcome.is_err() {
            tracing::warn!(worker = self.id, "work item panicked");
        }
    }
}
