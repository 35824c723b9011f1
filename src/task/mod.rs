//! The task primitive.
//!
//! A [`Task`] is a single-assignment completion cell with one attachable
//! continuation. Completion and attachment both resolve under the cell's
//! own lock; the continuation hand-off to the executor always happens
//! outside it.

mod core;
mod future;
mod state;

pub use core::Task;
pub use future::TaskFuture;
