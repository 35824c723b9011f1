use crate::context::AmbientContext;
use crate::executor::core::Executor;

use std::sync::Arc;
use std::thread;

/// Builder for configuring and creating an [`Executor`].
///
/// # Examples
///
/// ```rust,ignore
/// let executor = ExecutorBuilder::new()
///     .worker_threads(4)
///     .build();
/// ```
pub struct ExecutorBuilder {
    /// Number of worker threads in the pool.
    worker_threads: usize,

    /// Optional ambient-context facility injected into the pool.
    context: Option<Arc<dyn AmbientContext>>,
}

impl ExecutorBuilder {
    /// Creates a new `ExecutorBuilder` with default configuration.
    ///
    /// By default, the number of worker threads is set to the number
    /// of available logical CPUs, falling back to `1` if unavailable.
    /// No ambient-context facility is configured.
    pub fn new() -> Self {
        let worker_threads = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        Self {
            worker_threads,
            context: None,
        }
    }

    /// Sets the number of worker threads used by the executor.
    ///
    /// # Panics
    ///
    /// Panics if `n == 0`.
    pub fn worker_threads(mut self, n: usize) -> Self {
        assert!(n > 0, "worker_threads must be > 0");

        self.worker_threads = n;
        self
    }

    /// Installs an ambient-context facility.
    ///
    /// When set, the executor captures a snapshot at every submission
    /// and continuation attachment, and restores it around execution.
    pub fn ambient_context(mut self, facility: Arc<dyn AmbientContext>) -> Self {
        self.context = Some(facility);
        self
    }

    /// Builds the executor with the configured options.
    ///
    /// This starts the worker threads.
    pub fn build(self) -> Executor {
        Executor::new(self.worker_threads, self.context)
    }
}

impl Default for ExecutorBuilder {
    /// Creates a default `ExecutorBuilder`.
    fn default() -> Self {
        Self::new()
    }
}
