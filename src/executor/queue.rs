use crate::context::{Callback, ContextSnapshot};

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

/// A unit of work submitted to the executor.
///
/// Pairs a run-once callback with the ambient-context snapshot that was
/// captured when the callback was registered, if any.
pub(crate) struct WorkItem {
    /// The callback to execute.
    pub(crate) callback: Callback,

    /// Snapshot to restore around the callback, when a facility is set.
    pub(crate) snapshot: Option<ContextSnapshot>,
}

/// The executor's shared work queue.
///
/// A single unbounded FIFO used by every producer and every worker
/// thread at once. Submission never blocks; dequeue blocks while the
/// queue is empty and open, and returns `None` once the queue has been
/// closed for shutdown.
pub(crate) struct WorkQueue {
    /// Queued items plus the closed flag, under one lock.
    inner: Mutex<QueueState>,

    /// Wakes workers blocked on an empty queue.
    condvar: Condvar,
}

struct QueueState {
    items: VecDeque<WorkItem>,
    closed: bool,
}

impl WorkQueue {
    /// Creates a new empty, open queue.
    pub(crate) fn new() -> Self {
        Self {
            inner: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
            }),
            condvar: Condvar::new(),
        }
    }

    /// Pushes a work item onto the back of the queue.
    ///
    /// Items pushed after the queue has closed are dropped; one blocked
    /// worker is woken otherwise.
    pub(crate) fn push(&self, item: WorkItem) {
        let mut state = self.inner.lock().unwrap();

        if state.closed {
            return;
        }

        state.items.push_back(item);
        drop(state);

        self.condvar.notify_one();
    }

    /// Removes the item at the front of the queue, blocking while the
    /// queue is empty.
    ///
    /// Returns `None` once the queue has been closed.
    pub(crate) fn pop(&self) -> Option<WorkItem> {
        let mut state = self.inner.lock().unwrap();

        loop {
            if state.closed {
                return None;
            }

            if let Some(item) = state.items.pop_front() {
                return Some(item);
            }

            state = self.condvar.wait(state).unwrap();
        }
    }

    /// Closes the queue and wakes every blocked worker.
    pub(crate) fn close(&self) {
        let mut state = self.inner.lock().unwrap();
        state.closed = true;
        drop(state);

        self.condvar.notify_all();
    }
}
