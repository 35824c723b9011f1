//! The fixed thread-pool executor.
//!
//! This module contains the work queue, the worker loop, and the
//! executor lifecycle. Workers drain one shared unbounded FIFO; work
//! is submitted through cloneable handles and never blocks the
//! submitter.

mod core;
mod queue;
mod worker;

pub(crate) mod builder;

pub(crate) use queue::WorkItem;

pub use builder::ExecutorBuilder;
pub use core::{Executor, ExecutorHandle};
