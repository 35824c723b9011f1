//! Ambient-context capture and restore.
//!
//! Continuations and work items can carry a snapshot of caller-local
//! state, captured when the callback is registered and restored around
//! its deferred execution. The runtime is oblivious to the snapshot's
//! contents; it only asks an injected [`AmbientContext`] facility to
//! capture at attachment/submission time and restore at execution time.

use std::any::Any;
use std::cell::RefCell;
use std::sync::Arc;

/// A boxed, sendable, run-once callback.
pub type Callback = Box<dyn FnOnce() + Send + 'static>;

/// An opaque handle to captured ambient state.
///
/// Only the [`AmbientContext`] facility that produced a snapshot knows
/// how to interpret it.
#[derive(Clone)]
pub struct ContextSnapshot(Arc<dyn Any + Send + Sync>);

impl ContextSnapshot {
    /// Wraps an arbitrary value as an opaque snapshot.
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Arc::new(value))
    }

    /// Attempts to view the snapshot as a concrete type.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }
}

/// A facility that captures caller-local state and restores it around
/// deferred execution.
///
/// An executor configured with a facility captures a snapshot whenever a
/// callback is submitted or a continuation is attached, and restores it
/// for the duration of that callback on the worker thread.
pub trait AmbientContext: Send + Sync + 'static {
    /// Captures the current caller-local state.
    fn snapshot(&self) -> ContextSnapshot;

    /// Runs `callback` with `snapshot` restored as the ambient state.
    ///
    /// The previous ambient state of the executing thread must be
    /// restored once the callback returns.
    fn run_with(&self, snapshot: &ContextSnapshot, callback: Callback);
}

thread_local! {
    /// Thread-local label propagated by [`TaskLabel`].
    static CURRENT_LABEL: RefCell<Option<String>> = const { RefCell::new(None) };
}

/// A thread-local label facility.
///
/// `TaskLabel` propagates a per-logical-flow string label across
/// deferred execution: the label set on the submitting thread is visible
/// inside continuations that were registered while it was set, no matter
/// which worker thread runs them.
///
/// # Examples
///
/// ```rust,ignore
/// TaskLabel::set("request-17");
/// let task = run(&handle, || {
///     assert_eq!(TaskLabel::get().as_deref(), Some("request-17"));
///     Ok(())
/// });
/// ```
pub struct TaskLabel;

impl TaskLabel {
    /// Sets the label for the current thread.
    pub fn set(label: impl Into<String>) {
        CURRENT_LABEL.with(|cell| *cell.borrow_mut() = Some(label.into()));
    }

    /// Clears the label for the current thread.
    pub fn clear() {
        CURRENT_LABEL.with(|cell| *cell.borrow_mut() = None);
    }

    /// Returns the label visible on the current thread.
    pub fn get() -> Option<String> {
        CURRENT_LABEL.with(|cell| cell.borrow().clone())
    }
}

impl AmbientContext for TaskLabel {
    fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot::new(Self::get())
    }

    fn run_with(&self, snapshot: &ContextSnapshot, callback: Callback) {
        let restored = snapshot
            .downcast_ref::<Option<String>>()
            .cloned()
            .unwrap_or_default();

        let previous = CURRENT_LABEL.with(|cell| cell.replace(restored));
        let _restore = RestoreLabel(previous);

        callback();
    }
}

/// Restores the previous thread label on drop, unwinding included.
struct RestoreLabel(Option<String>);

impl Drop for RestoreLabel {
    fn drop(&mut self) {
        let previous = self.0.take();
        CURRENT_LABEL.with(|cell| *cell.borrow_mut() = previous);
    }
}
