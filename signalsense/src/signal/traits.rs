//! Trait interfaces for signal-processing capabilities.
//!
//! Each capability comes in two shapes: `run_into` writes into a
//! caller-provided buffer and checks its length, `run_alloc` allocates.

use crate::kernel::{Read1D, Result, Write1D};
use nalgebra::Complex;
use rand::Rng;

/// Output tuple for splitting roots into conjugate-paired complex and real sets.
pub type ComplexSplit<T> = (Vec<Complex<T>>, Vec<T>);

/// 1D sine-wave generation capability.
pub trait SineWave1D<T> {
    /// Number of samples the configured generator produces.
    fn num_samples(&self) -> usize;

    /// Generate the waveform into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<()>
    where
        O: Write1D<T> + ?Sized;

    /// Generate the waveform and allocate output.
    fn run_alloc(&self) -> Result<Vec<T>>;
}

/// 1D additive-noise capability.
pub trait NoiseInject1D<T> {
    /// Perturb `input` with draws from `rng` into a caller-provided output buffer.
    fn run_into<R, I, O>(&self, rng: &mut R, input: &I, out: &mut O) -> Result<()>
    where
        R: Rng + ?Sized,
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Perturb `input` with draws from `rng` and allocate output.
    fn run_alloc<R, I>(&self, rng: &mut R, input: &I) -> Result<Vec<T>>
    where
        R: Rng + ?Sized,
        I: Read1D<T> + ?Sized;
}

/// IIR design capability.
pub trait IirDesign<T> {
    /// Output representation produced by the design kernel.
    type Output;

    /// Run IIR design and allocate output representation.
    fn run_alloc(&self) -> Result<Self::Output>;
}

/// Complex root pairing/splitting capability.
pub trait ComplexPairSplit<T> {
    /// Split roots into conjugate-paired complex roots (one representative
    /// with positive imaginary part per pair) and real roots.
    fn run_alloc(&self, roots: &[Complex<T>]) -> Result<ComplexSplit<T>>;
}

/// 1D `lfilter` capability.
pub trait LFilter1D<T> {
    /// Run filtering into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run filtering and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>>
    where
        I: Read1D<T> + ?Sized;
}

/// `lfilter_zi` design capability.
pub trait LFilterZiDesign1D<T> {
    /// Compute initial state into a caller-provided output buffer.
    fn run_into<O>(&self, out: &mut O) -> Result<()>
    where
        O: Write1D<T> + ?Sized;

    /// Compute initial state and allocate output.
    fn run_alloc(&self) -> Result<Vec<T>>;
}

/// 1D `filtfilt` capability.
pub trait FiltFilt1D<T> {
    /// Run zero-phase filtering into a caller-provided output buffer.
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized;

    /// Run zero-phase filtering and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>>
    where
        I: Read1D<T> + ?Sized;
}

/// One-sided amplitude spectrum capability.
pub trait AmplitudeSpectrum1D<T> {
    /// Output representation of the spectrum.
    type Output;

    /// Compute bin frequencies and magnitudes into caller-provided buffers.
    fn run_into<I, OF, OM>(&self, input: &I, freqs: &mut OF, mags: &mut OM) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        OF: Write1D<T> + ?Sized,
        OM: Write1D<T> + ?Sized;

    /// Compute the spectrum and allocate output.
    fn run_alloc<I>(&self, input: &I) -> Result<Self::Output>
    where
        I: Read1D<T> + ?Sized;
}
