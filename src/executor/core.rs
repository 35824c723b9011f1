use crate::context::{AmbientContext, ContextSnapshot};
use crate::executor::queue::{WorkItem, WorkQueue};
use crate::executor::worker::Worker;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// State shared between the executor, its handles, and its workers.
pub(crate) struct Shared {
    /// The single work queue drained by every worker.
    pub(crate) queue: WorkQueue,

    /// Optional ambient-context facility.
    ///
    /// When set, a snapshot is captured at submission/attachment time
    /// and restored around callback execution.
    pub(crate) context: Option<Arc<dyn AmbientContext>>,
}

/// A fixed-size thread-pool executor.
///
/// The `Executor` owns its worker threads and the shared work queue.
/// Work is submitted through cloneable [`ExecutorHandle`]s; any idle
/// worker may claim any queued item, so submission order is FIFO but
/// completion order across workers is not guaranteed.
///
/// Dropping the executor closes the queue and joins all workers.
pub struct Executor {
    /// Submission handle kept for cloning.
    handle: ExecutorHandle,

    /// Join handles for worker threads.
    workers: Vec<JoinHandle<()>>,
}

impl Executor {
    /// Creates a new executor with the given number of worker threads.
    pub(crate) fn new(worker_threads: usize, context: Option<Arc<dyn AmbientContext>>) -> Self {
        let shared = Arc::new(Shared {
            queue: WorkQueue::new(),
            context,
        });

        let handle = ExecutorHandle {
            shared: shared.clone(),
        };

        tracing::debug!(worker_threads, "starting executor");

        let mut workers = Vec::with_capacity(worker_threads);

        for id in 0..worker_threads {
            let worker = Worker::new(id, shared.clone());

            let join = thread::Builder::new()
                .name(format!("segue-worker-{id}"))
                .spawn(move || worker.run())
                .expect("failed to spawn worker thread");

            workers.push(join);
        }

        Self { handle, workers }
    }

    /// Returns a cloneable submission handle.
    pub fn handle(&self) -> ExecutorHandle {
        self.handle.clone()
    }

    /// Signals all workers to shut down.
    ///
    /// Closes the queue and wakes every blocked worker. Items still
    /// queued at this point are dropped without running.
    pub fn shutdown(&self) {
        tracing::debug!("shutting down executor");
        self.handle.shared.queue.close();
    }

    /// Waits for all worker threads to terminate.
    ///
    /// This should be called after initiating shutdown.
    pub fn join(&mut self) {
        for worker in self.workers.drain(..) {
            let _ = worker.join();
        }
    }
}

impl Drop for Executor {
    /// Shuts down the executor and joins all worker threads.
    fn drop(&mut self) {
        self.shutdown();
        self.join();
    }
}

/// A cloneable handle for submitting work to an [`Executor`].
///
/// Handles stay valid after the executor shuts down; submissions made
/// past that point are silently dropped.
#[derive(Clone)]
pub struct ExecutorHandle {
    pub(crate) shared: Arc<Shared>,
}

impl ExecutorHandle {
    /// Submits a callback for execution on the pool.
    ///
    /// Never blocks the submitter. If an ambient-context facility is
    /// configured, the caller's state is snapshotted now and restored
    /// around the callback on the worker thread.
    pub fn submit<F>(&self, callback: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.submit_item(WorkItem {
            callback: Box::new(callback),
            snapshot: self.capture_snapshot(),
        });
    }

    /// Submits a pre-assembled work item, keeping its original snapshot.
    pub(crate) fn submit_item(&self, item: WorkItem) {
        self.shared.queue.push(item);
    }

    /// Captures the current ambient state, if a facility is configured.
    pub(crate) fn capture_snapshot(&self) -> Option<ContextSnapshot> {
        self.shared.context.as_ref().map(|facility| facility.snapshot())
    }
}
