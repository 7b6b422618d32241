//! Linear and zero-phase filtering with IIR/FIR coefficient sets.

/// Digital Butterworth low-pass design.
pub mod design;

mod filtfilt;
mod kernels;
mod lfilter;
mod lfilter_zi;

pub use filtfilt::*;
pub use kernels::*;
pub use lfilter::*;
pub use lfilter_zi::*;
