//! Shared error taxonomy and numpy-like numeric primitives used by `signalsense`.

use core::{error, fmt};

pub mod num_rs;

/// Errors raised whilst running signalsense.
///
/// Every variant except [`Error::NonFiniteOutput`] is a validation failure
/// detected before any computation starts. No variant comes with a partial
/// result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Waveform generation was requested with a non-positive duration or
    /// sample rate, an out of range frequency or amplitude, or parameters
    /// that produce zero samples.
    InvalidGenerationParameters {
        /// Explaining which parameter was rejected.
        reason: &'static str,
    },
    /// Noise standard deviation was negative or not finite.
    InvalidNoiseLevel,
    /// Filter order must be at least one.
    InvalidOrder {
        /// The rejected order.
        order: usize,
    },
    /// Cutoff frequency was at or above the Nyquist frequency `fs / 2`.
    CutoffAboveNyquist,
    /// Signal is too short for edge padding with the given filter.
    SignalTooShortForFiltering {
        /// Received signal length.
        len: usize,
        /// Minimum signal length for the filter.
        min_len: usize,
    },
    /// Spectral analysis of a zero-length signal.
    EmptySignal,
    /// A designed filter cannot be expressed as `b`/`a` coefficients at this
    /// order and cutoff without its response exceeding unity gain or its
    /// denominator leaving the unit circle.
    IllConditionedFilter {
        /// The rejected order.
        order: usize,
    },
    /// Denominator coefficients have a root on or outside the unit circle.
    UnstableFilter,
    /// Filtering produced NaN or infinite samples.
    NonFiniteOutput,
    /// Argument parsed into function were invalid.
    InvalidArg {
        /// The invalid arg
        arg: &'static str,
        /// Explaining why arg is invalid.
        reason: &'static str,
    },
    /// Output/input lengths did not match required shape.
    LengthMismatch {
        /// Name of the argument.
        arg: &'static str,
        /// Required length.
        expected: usize,
        /// Received length.
        got: usize,
    },
    /// A contiguous 1D slice view could not be obtained.
    NonContiguous {
        /// Name of the argument that is non-contiguous.
        arg: &'static str,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidGenerationParameters { reason } => {
                write!(f, "Invalid generation parameters: {reason}")
            }
            Error::InvalidNoiseLevel => {
                write!(f, "Invalid noise level: must be finite and >= 0.")
            }
            Error::InvalidOrder { order } => {
                write!(f, "Invalid filter order {order}: must be at least 1.")
            }
            Error::CutoffAboveNyquist => {
                write!(f, "Cutoff frequency must be below Nyquist frequency.")
            }
            Error::SignalTooShortForFiltering { len, min_len } => write!(
                f,
                "Signal of length {len} is too short for filtering; \
                 at least {min_len} samples required."
            ),
            Error::EmptySignal => write!(f, "Signal was empty."),
            Error::IllConditionedFilter { order } => write!(
                f,
                "Filter of order {order} is ill-conditioned at this cutoff; \
                 lower the order or raise the cutoff."
            ),
            Error::UnstableFilter => {
                write!(f, "Filter denominator is unstable.")
            }
            Error::NonFiniteOutput => write!(f, "Filtering produced non-finite samples."),
            Error::InvalidArg { arg, reason } => {
                write!(f, "Invalid argument `{arg}`: {reason}")
            }
            Error::LengthMismatch { arg, expected, got } => write!(
                f,
                "Length mismatch on `{arg}`. Expected {expected}, got {got}."
            ),
            Error::NonContiguous { arg } => {
                write!(f, "Argument `{arg}` is not contiguous in memory.")
            }
        }
    }
}

impl error::Error for Error {}

/// Result alias over [`Error`].
pub type Result<T> = core::result::Result<T, Error>;
