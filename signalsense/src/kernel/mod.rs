//! Shared trait-first kernel substrate.
//!
//! Every pipeline stage is a kernel: a plain `XConfig` struct validated once by
//! [`KernelLifecycle::try_new`], then run any number of times against 1D
//! buffers through the [`Read1D`] / [`Write1D`] adapters.

mod io;
mod lifecycle;

pub use io::*;
pub use lifecycle::*;
pub use signalsense_core::{Error, Result};
