//! Spectral analysis helpers: one-sided amplitude spectra and filter
//! frequency responses.

use crate::kernel::{check_out_len, Error, KernelLifecycle, Read1D, Result, Write1D};
use crate::signal::filter::design::BaFormatFilter;
use crate::signal::traits::AmplitudeSpectrum1D;
use core::cmp::Ordering;
use itertools::Itertools;
use nalgebra::{Complex, RealField};
use signalsense_core::num_rs::{fft_real, polyval_complex};

/// One-sided amplitude spectrum of a real signal.
///
/// `frequencies` run from `0` in steps of `fs / N` and stay strictly below
/// `fs / 2`; `magnitudes` are the matching non-negative amplitudes. Both have
/// `floor(N / 2)` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum<F> {
    frequencies: Vec<F>,
    magnitudes: Vec<F>,
}

impl<F> Spectrum<F>
where
    F: RealField + Copy,
{
    /// Bin center frequencies in Hz.
    pub fn frequencies(&self) -> &[F] {
        &self.frequencies
    }

    /// Bin amplitudes.
    pub fn magnitudes(&self) -> &[F] {
        &self.magnitudes
    }

    /// Number of bins.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    /// `true` when there are no bins, as for a single-sample signal.
    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Frequency and amplitude of the strongest bin.
    pub fn peak(&self) -> Option<(F, F)> {
        self.magnitudes
            .iter()
            .position_max_by(|l, r| l.partial_cmp(r).unwrap_or(Ordering::Equal))
            .map(|i| (self.frequencies[i], self.magnitudes[i]))
    }

    /// Sum of squared amplitudes of all bins strictly above `frequency`.
    pub fn energy_above(&self, frequency: F) -> F {
        self.frequencies
            .iter()
            .zip(self.magnitudes.iter())
            .filter(|(f, _)| **f > frequency)
            .fold(F::zero(), |acc, (_, m)| acc + *m * *m)
    }

    /// Consume into `(frequencies, magnitudes)`.
    pub fn into_parts(self) -> (Vec<F>, Vec<F>) {
        (self.frequencies, self.magnitudes)
    }
}

/// Constructor config for [`AmplitudeSpectrumKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeSpectrumConfig<F> {
    /// Sampling frequency in Hz.
    pub fs: F,
}

/// Trait-first one-sided amplitude spectrum kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmplitudeSpectrumKernel<F> {
    fs: F,
}

impl<F> KernelLifecycle for AmplitudeSpectrumKernel<F>
where
    F: RealField + Copy,
{
    type Config = AmplitudeSpectrumConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self> {
        if !config.fs.is_finite() || config.fs <= F::zero() {
            return Err(Error::InvalidArg {
                arg: "fs",
                reason: "fs must be finite and > 0",
            });
        }
        Ok(Self { fs: config.fs })
    }
}

impl<F> AmplitudeSpectrumKernel<F>
where
    F: RealField + Copy,
{
    /// Number of one-sided bins for `n` samples.
    pub fn num_bins(n: usize) -> usize {
        n / 2
    }

    fn fill(&self, x: &[F], freqs: &mut [F], mags: &mut [F]) {
        let n = nalgebra::convert::<f64, F>(x.len() as f64);
        let two = F::one() + F::one();
        let spec = fft_real(x);
        for (k, (f, m)) in freqs.iter_mut().zip(mags.iter_mut()).enumerate() {
            let kf = nalgebra::convert::<f64, F>(k as f64);
            *f = kf * self.fs / n;
            let amp = spec[k].norm_sqr().sqrt() / n;
            *m = if k == 0 { amp } else { two * amp };
        }
    }
}

impl<F> AmplitudeSpectrum1D<F> for AmplitudeSpectrumKernel<F>
where
    F: RealField + Copy,
{
    type Output = Spectrum<F>;

    fn run_into<I, OF, OM>(&self, input: &I, freqs: &mut OF, mags: &mut OM) -> Result<()>
    where
        I: Read1D<F> + ?Sized,
        OF: Write1D<F> + ?Sized,
        OM: Write1D<F> + ?Sized,
    {
        let input = input.read_slice()?;
        if input.is_empty() {
            return Err(Error::EmptySignal);
        }
        let expected = Self::num_bins(input.len());
        let freqs = freqs.write_slice_mut()?;
        check_out_len("freqs", expected, freqs.len())?;
        let mags = mags.write_slice_mut()?;
        check_out_len("mags", expected, mags.len())?;
        self.fill(input, freqs, mags);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Self::Output>
    where
        I: Read1D<F> + ?Sized,
    {
        let input = input.read_slice()?;
        if input.is_empty() {
            return Err(Error::EmptySignal);
        }
        let bins = Self::num_bins(input.len());
        let mut frequencies = vec![F::zero(); bins];
        let mut magnitudes = vec![F::zero(); bins];
        self.fill(input, &mut frequencies, &mut magnitudes);
        Ok(Spectrum {
            frequencies,
            magnitudes,
        })
    }
}

/// One-sided amplitude spectrum of `x` sampled at `fs` Hz.
///
/// Bin `k` (`0 <= k < floor(N / 2)`) sits at `k * fs / N` with amplitude
/// `2 |X_k| / N`, where `X` is the DFT of `x`. The DC bin has no mirror image
/// and is reported as `|X_0| / N`, so a constant signal `c` shows up as `c`.
/// A sinusoid of amplitude `A` exactly on a bin reports `A`.
///
/// # Errors
/// * [`Error::EmptySignal`] for an empty `x`.
/// * [`Error::InvalidArg`] for a non-positive or non-finite `fs`.
///
/// # Example
/// ```
/// use signalsense::signal::spectral::spectrum;
///
/// let x = (0..1000)
///     .map(|k| 3.0 * (std::f64::consts::TAU * 50.0 * k as f64 / 1000.0).sin())
///     .collect::<Vec<_>>();
/// let s = spectrum(&x, 1000.0).unwrap();
/// let (f, m) = s.peak().unwrap();
/// assert_eq!(f, 50.0);
/// assert!((m - 3.0).abs() < 1e-9);
/// ```
pub fn spectrum<F>(x: &[F], fs: F) -> Result<Spectrum<F>>
where
    F: RealField + Copy,
{
    let kernel = AmplitudeSpectrumKernel::try_new(AmplitudeSpectrumConfig { fs })?;
    tracing::debug!(samples = x.len(), "computing amplitude spectrum");
    kernel.run_alloc(x)
}

/// Compute the frequency response of a digital filter.
///
/// Evaluates `H(e^{jw}) = B(e^{jw}) / A(e^{jw})` at `wor_n` equally spaced
/// points `w = pi * i / wor_n` of `[0, pi)`. Returns `(w, h)`, `w` in radians
/// per sample.
pub fn freqz<F>(ba: &BaFormatFilter<F>, wor_n: usize) -> (Vec<F>, Vec<Complex<F>>)
where
    F: RealField + Copy,
{
    let n = nalgebra::convert::<f64, F>(wor_n as f64);
    (0..wor_n)
        .map(|i| {
            let omega = F::pi() * nalgebra::convert::<f64, F>(i as f64) / n;
            // b and a share a length, so the common z^{-(n-1)} factor cancels.
            let z = Complex::new(omega.cos(), omega.sin());
            (omega, polyval_complex(ba.b(), z) / polyval_complex(ba.a(), z))
        })
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::filter::design::butter_lowpass;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustfft::FftPlanner;

    fn tone(frequency: f64, amplitude: f64, n: usize, fs: f64) -> Vec<f64> {
        (0..n)
            .map(|k| amplitude * (core::f64::consts::TAU * frequency * k as f64 / fs).sin())
            .collect()
    }

    #[test]
    fn bins_are_half_open_up_to_nyquist() {
        for (n, fs) in [(2000, 1000.0), (7, 7.0), (8, 16.0), (2, 10.0)] {
            let s = spectrum(&vec![1.0; n], fs).expect("non-empty");
            assert_eq!(s.len(), n / 2);
            assert_eq!(s.frequencies()[0], 0.0);
            assert!(s.frequencies().windows(2).all(|w| w[0] < w[1]));
            assert!(*s.frequencies().last().expect("bins") < fs / 2.0);
            s.frequencies()
                .iter()
                .enumerate()
                .for_each(|(k, f)| assert_abs_diff_eq!(*f, k as f64 * fs / n as f64));
        }
    }

    #[test]
    fn on_bin_tone_reports_its_amplitude() {
        let x = tone(5.0, 1.0, 2000, 1000.0);
        let s = spectrum(&x, 1000.0).expect("non-empty");
        let (f, m) = s.peak().expect("bins");
        assert_eq!(f, 5.0);
        assert_abs_diff_eq!(m, 1.0, epsilon = 1e-9);
        assert!(s.magnitudes().iter().all(|m| *m >= 0.0));
    }

    #[test]
    fn dc_bin_is_not_doubled() {
        let s = spectrum(&[2.5f64; 64], 64.0).expect("non-empty");
        assert_abs_diff_eq!(s.magnitudes()[0], 2.5, epsilon = 1e-12);
        s.magnitudes()[1..]
            .iter()
            .for_each(|m| assert_abs_diff_eq!(*m, 0.0, epsilon = 1e-12));
    }

    #[test]
    fn matches_rustfft_reference() {
        let mut rng = StdRng::seed_from_u64(17);
        for n in [64, 100, 257] {
            let x = (0..n).map(|_| rng.random::<f64>() - 0.5).collect::<Vec<_>>();
            let s = spectrum(&x, 250.0).expect("non-empty");

            let mut buf = x
                .iter()
                .map(|v| rustfft::num_complex::Complex::new(*v, 0.0))
                .collect::<Vec<_>>();
            FftPlanner::new().plan_fft_forward(n).process(&mut buf);
            s.magnitudes().iter().enumerate().for_each(|(k, m)| {
                let scale = if k == 0 { 1.0 } else { 2.0 };
                assert_abs_diff_eq!(*m, scale * buf[k].norm() / n as f64, epsilon = 1e-10);
            });
        }
    }

    #[test]
    fn single_sample_has_no_bins() {
        let s = spectrum(&[4.0f64], 10.0).expect("non-empty");
        assert!(s.is_empty());
        assert_eq!(s.peak(), None);
    }

    #[test]
    fn rejects_empty_input_and_bad_rate() {
        assert_eq!(spectrum::<f64>(&[], 100.0), Err(Error::EmptySignal));
        assert!(matches!(
            spectrum(&[1.0f64, 2.0], 0.0),
            Err(Error::InvalidArg { arg: "fs", .. })
        ));
    }

    #[test]
    fn kernel_run_into_validates_output_shape() {
        let kernel = AmplitudeSpectrumKernel::try_new(AmplitudeSpectrumConfig { fs: 100.0 })
            .expect("valid config");
        let x = tone(10.0, 1.0, 100, 100.0);
        let mut f = vec![0.0; 50];
        let mut m = vec![0.0; 50];
        kernel.run_into(&x, &mut f, &mut m).expect("sized outputs");
        assert_eq!(kernel.run_alloc(&x).expect("alloc").into_parts(), (f, m));

        let mut short = vec![0.0; 49];
        let mut m = vec![0.0; 50];
        assert_eq!(
            kernel.run_into(&x, &mut short, &mut m),
            Err(Error::LengthMismatch {
                arg: "freqs",
                expected: 50,
                got: 49
            })
        );
    }

    #[test]
    fn energy_above_counts_only_higher_bins() {
        let x = tone(5.0, 1.0, 1000, 1000.0)
            .iter()
            .zip(tone(100.0, 0.5, 1000, 1000.0))
            .map(|(a, b)| a + b)
            .collect::<Vec<_>>();
        let s = spectrum(&x, 1000.0).expect("non-empty");
        assert_abs_diff_eq!(s.energy_above(50.0), 0.25, epsilon = 1e-9);
        assert_abs_diff_eq!(s.energy_above(0.0), 1.25, epsilon = 1e-9);
        assert_abs_diff_eq!(s.energy_above(100.0), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn freqz_of_moving_average() {
        let ba = BaFormatFilter::try_new(vec![0.5f64, 0.5], vec![1.0]).expect("valid");
        let (w, h) = freqz(&ba, 4);
        assert_eq!(w.len(), 4);
        assert_abs_diff_eq!(w[2], core::f64::consts::FRAC_PI_2, epsilon = 1e-15);
        // |H(w)| = |cos(w / 2)|
        w.iter()
            .zip(h.iter())
            .for_each(|(wi, hi)| assert_abs_diff_eq!(hi.norm(), (wi / 2.0).cos(), epsilon = 1e-12));
    }

    #[test]
    fn butterworth_response_is_monotone() {
        let ba = butter_lowpass(4, 10.0f64, 1000.0).expect("valid design");
        let (_, h) = ba.freqz(512);
        assert!(h
            .windows(2)
            .all(|p| p[1].norm() <= p[0].norm() + 1e-12));
    }
}
