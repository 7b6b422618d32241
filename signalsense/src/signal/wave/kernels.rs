//! Trait-first kernels for waveform generation.

use crate::kernel::{check_out_len, Error, KernelLifecycle, Result, Write1D};
use crate::signal::traits::SineWave1D;
use nalgebra::RealField;

/// Constructor config for [`SineWaveKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SineWaveConfig<F> {
    /// Tone frequency in Hz, in `(0, fs / 2)`.
    pub frequency: F,
    /// Peak amplitude, `> 0`.
    pub amplitude: F,
    /// Duration in seconds, `> 0`.
    pub duration: F,
    /// Sample rate in Hz, `> 0`.
    pub fs: F,
}

/// Trait-first uniformly sampled sine generator.
///
/// Produces `floor(fs * duration)` samples `amplitude * sin(2 pi f k / fs)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SineWaveKernel<F> {
    frequency: F,
    amplitude: F,
    fs: F,
    len: usize,
}

/// Largest number of samples a single generation may produce, 2^28 (2 GiB of
/// `f64`).
pub const MAX_SAMPLES: usize = 1 << 28;

fn invalid(reason: &'static str) -> Error {
    Error::InvalidGenerationParameters { reason }
}

impl<F> SineWaveKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured sample rate.
    pub fn fs(&self) -> F {
        self.fs
    }

    pub(super) fn sample(&self, k: usize) -> F {
        let t = nalgebra::convert::<f64, F>(k as f64) / self.fs;
        self.amplitude * (F::two_pi() * self.frequency * t).sin()
    }
}

impl<F> KernelLifecycle for SineWaveKernel<F>
where
    F: RealField + Copy,
{
    type Config = SineWaveConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self> {
        let SineWaveConfig {
            frequency,
            amplitude,
            duration,
            fs,
        } = config;
        if !fs.is_finite() || fs <= F::zero() {
            return Err(invalid("sample rate must be finite and > 0"));
        }
        if !duration.is_finite() || duration <= F::zero() {
            return Err(invalid("duration must be finite and > 0"));
        }
        let nyquist = fs / (F::one() + F::one());
        if !frequency.is_finite() || frequency <= F::zero() || frequency >= nyquist {
            return Err(invalid("frequency must satisfy 0 < frequency < fs/2"));
        }
        if !amplitude.is_finite() || amplitude <= F::zero() {
            return Err(invalid("amplitude must be finite and > 0"));
        }

        let len = nalgebra::try_convert::<F, f64>((fs * duration).floor())
            .filter(|n| n.is_finite())
            .ok_or(invalid("fs * duration is not representable"))?;
        if len > MAX_SAMPLES as f64 {
            return Err(invalid("fs * duration exceeds the sample limit"));
        }
        let len = len as usize;
        if len == 0 {
            return Err(invalid("fs * duration must yield at least one sample"));
        }

        Ok(Self {
            frequency,
            amplitude,
            fs,
            len,
        })
    }
}

impl<F> SineWave1D<F> for SineWaveKernel<F>
where
    F: RealField + Copy,
{
    fn num_samples(&self) -> usize {
        self.len
    }

    fn run_into<O>(&self, out: &mut O) -> Result<()>
    where
        O: Write1D<F> + ?Sized,
    {
        let out = out.write_slice_mut()?;
        check_out_len("out", self.len, out.len())?;
        out.iter_mut()
            .enumerate()
            .for_each(|(k, y)| *y = self.sample(k));
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<F>> {
        Ok((0..self.len).map(|k| self.sample(k)).collect())
    }
}
