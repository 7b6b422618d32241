//! Sine synthesis, Gaussian noise injection, zero-phase Butterworth low-pass
//! filtering and one-sided amplitude spectra.
//!
//! Every stage is a kernel: a plain config validated once through
//! [`kernel::KernelLifecycle::try_new`], then run against 1D buffers. Free
//! functions wrap the kernels for one-shot use:
//!
//! ```
//! use signalsense::signal::filter::design::butter_lowpass;
//! use signalsense::signal::filter::filtfilt_signal;
//! use signalsense::signal::noise::add_noise_seeded;
//! use signalsense::signal::wave::{sine, SineWaveConfig};
//!
//! let clean = sine(SineWaveConfig {
//!     frequency: 5.0,
//!     amplitude: 1.0,
//!     duration: 2.0,
//!     fs: 1000.0,
//! })
//! .unwrap();
//! let noisy = add_noise_seeded(&clean, 0.5, 42).unwrap();
//! let ba = butter_lowpass(4, 10.0, 1000.0).unwrap();
//! let filtered = filtfilt_signal(&ba, &noisy).unwrap();
//!
//! let (peak, _) = filtered.spectrum().unwrap().peak().unwrap();
//! assert_eq!(peak, 5.0);
//! ```
//!
//! [`pipeline::run`] chains the same stages from a single config.

#![warn(missing_docs)]

pub mod kernel;
pub mod linalg;
pub mod pipeline;
pub mod signal;

pub use signalsense_core::{Error, Result};
