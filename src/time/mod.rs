//! Timed task utilities.
//!
//! This module provides the one-shot [`Timer`] service and the
//! [`delay`] combinator built on top of it.

mod delay;
mod timer;

#[doc(inline)]
pub use delay::delay;

#[doc(inline)]
pub use timer::Timer;
