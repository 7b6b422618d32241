//! Numpy-like numeric primitives, written without external numeric backends.

mod fft;
mod poly;

pub use fft::*;
pub use poly::*;
