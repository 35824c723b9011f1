//! # Segue
//!
//! **Segue** is a minimal task runtime built from first principles. It
//! shows how language-level `await` sugar can be implemented without a
//! built-in async runtime: a [`Task`] is a single-assignment completion
//! cell with manual continuation scheduling, work runs on a fixed-size
//! thread-pool [`Executor`], and a small set of combinators composes
//! tasks into chains, fan-ins, delays, and sequential iterations.
//!
//! Segue offers:
//!
//! - A **completion-cell task primitive** with an at-most-once
//!   transition and a single continuation slot
//! - A **fixed thread-pool executor** draining one shared FIFO queue
//! - **Combinators**: [`run`], [`delay`], `continue_with` (two forms),
//!   [`when_all`], and [`iterate`]
//! - A one-shot [`Timer`] service backing [`delay`]
//! - An injectable **ambient-context facility** for propagating
//!   caller-local state into deferred continuations
//! - Native `await` integration: every task is [`IntoFuture`]
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use segue::{ExecutorBuilder, run};
//!
//! let executor = ExecutorBuilder::new().build();
//! let handle = executor.handle();
//!
//! let task = run(&handle, || {
//!     println!("hello from the pool");
//!     Ok(())
//! });
//!
//! task.wait().unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`task`] — the completion-cell primitive and its future adapter
//! - [`executor`] — the thread pool, work queue, and builder
//! - [`combinators`] — `run`, `when_all`, `iterate`
//! - [`time`] — the timer service and `delay`
//! - [`context`] — ambient-context capture and restore
//! - [`error`] — failure values and transition errors
//!
//! [`IntoFuture`]: std::future::IntoFuture

pub mod combinators;
pub mod context;
pub mod error;
pub mod executor;
pub mod task;
pub mod time;

pub use combinators::{iterate, run, when_all};
pub use context::{AmbientContext, ContextSnapshot, TaskLabel};
pub use error::{ActionPanicked, Failure, PropagatedFailure, TaskError, failure};
pub use executor::{Executor, ExecutorBuilder, ExecutorHandle};
pub use task::{Task, TaskFuture};
pub use time::{Timer, delay};
