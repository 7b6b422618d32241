//! Signal synthesis, filtering and spectral analysis.

use crate::kernel::{Error, Read1D, Result};
use nalgebra::RealField;
use ndarray::{Array1, ArrayView1};

/// Digital IIR filter design and linear / zero-phase filtering.
pub mod filter;
/// Additive Gaussian noise.
pub mod noise;
/// One-sided amplitude spectra.
pub mod spectral;
/// Trait-first capability interfaces.
pub mod traits;
/// Waveform generation.
pub mod wave;

/// A finite, uniformly sampled, real-valued time series.
///
/// Holds at least one sample and a finite, positive sample rate `fs` (Hz);
/// sample `k` sits at time `k / fs`. Stages never mutate a signal in place;
/// each one returns a new `SampledSignal` of the same length and rate.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledSignal<F> {
    samples: Vec<F>,
    fs: F,
}

impl<F> SampledSignal<F>
where
    F: RealField + Copy,
{
    /// Wrap `samples` taken at `fs` Hz.
    ///
    /// Fails with [`Error::EmptySignal`] for no samples and
    /// [`Error::InvalidArg`] for a non-positive or non-finite `fs`.
    pub fn try_new(samples: Vec<F>, fs: F) -> Result<Self> {
        if samples.is_empty() {
            return Err(Error::EmptySignal);
        }
        if !fs.is_finite() || fs <= F::zero() {
            return Err(Error::InvalidArg {
                arg: "fs",
                reason: "fs must be finite and > 0",
            });
        }
        Ok(Self { samples, fs })
    }

    /// Same rate, new samples. Callers guarantee `samples` is non-empty.
    pub(crate) fn with_samples(&self, samples: Vec<F>) -> Self {
        debug_assert!(!samples.is_empty());
        Self {
            samples,
            fs: self.fs,
        }
    }

    /// Borrow the samples.
    pub fn samples(&self) -> &[F] {
        &self.samples
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> F {
        self.fs
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; a `SampledSignal` holds at least one sample.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Covered time span `len / fs` in seconds.
    pub fn duration(&self) -> F {
        nalgebra::convert::<f64, F>(self.len() as f64) / self.fs
    }

    /// Sample instants `k / fs`, the half-open window `[0, duration)`.
    pub fn times(&self) -> Vec<F> {
        (0..self.len())
            .map(|k| nalgebra::convert::<f64, F>(k as f64) / self.fs)
            .collect()
    }

    /// Borrow the samples as an `ndarray` view.
    pub fn view(&self) -> ArrayView1<'_, F> {
        ArrayView1::from(self.samples.as_slice())
    }

    /// Copy the samples into an owned `ndarray`.
    pub fn to_array(&self) -> Array1<F> {
        Array1::from(self.samples.clone())
    }

    /// Take ownership of the samples.
    pub fn into_samples(self) -> Vec<F> {
        self.samples
    }

    /// One-sided amplitude spectrum of this signal, see [`spectral::spectrum`].
    pub fn spectrum(&self) -> Result<spectral::Spectrum<F>> {
        spectral::spectrum(&self.samples, self.fs)
    }
}

impl<F> Read1D<F> for SampledSignal<F> {
    fn read_slice(&self) -> Result<&[F]> {
        Ok(self.samples.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn construction_enforces_invariants() {
        assert_eq!(
            SampledSignal::<f64>::try_new(vec![], 100.0),
            Err(Error::EmptySignal)
        );
        for fs in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                SampledSignal::try_new(vec![1.0], fs),
                Err(Error::InvalidArg { arg: "fs", .. })
            ));
        }
        let s = SampledSignal::try_new(vec![1.0, 2.0], 10.0).expect("valid signal");
        assert_eq!(s.len(), 2);
        assert!(!s.is_empty());
    }

    #[test]
    fn time_axis_is_half_open() {
        let s = SampledSignal::try_new(vec![0.0f64; 4], 4.0).expect("valid signal");
        assert_eq!(s.times(), vec![0.0, 0.25, 0.5, 0.75]);
        assert_abs_diff_eq!(s.duration(), 1.0);
    }

    #[test]
    fn views_share_the_samples() {
        let s = SampledSignal::try_new(vec![1.0f32, 2.0, 3.0], 3.0).expect("valid signal");
        assert_eq!(s.view().len(), 3);
        assert_eq!(s.to_array()[2], 3.0);
        assert_eq!(s.read_slice().expect("contiguous"), &[1.0, 2.0, 3.0]);
        assert_eq!(s.into_samples(), vec![1.0, 2.0, 3.0]);
    }
}
