use crate::kernel::{KernelLifecycle, Result};
use crate::signal::traits::SineWave1D;
use crate::signal::SampledSignal;
use nalgebra::RealField;

mod kernels;
pub use kernels::*;

/// Generate a clean, uniformly sampled sine wave.
///
/// Returns `N = floor(fs * duration)` samples where sample `k` is
/// `amplitude * sin(2 * pi * frequency * k / fs)`. The time window is
/// half-open, so `t = duration` itself is never sampled and sample `0` is
/// always exactly `0`.
///
/// # Errors
/// [`Error::InvalidGenerationParameters`](crate::kernel::Error::InvalidGenerationParameters)
/// when `duration` or `fs` is not positive, `frequency` lies outside
/// `(0, fs / 2)`, `amplitude` is not positive, or fewer than one sample
/// would be produced.
///
/// # Example
/// ```
/// use signalsense::signal::wave::{sine, SineWaveConfig};
///
/// let clean = sine(SineWaveConfig {
///     frequency: 5.0,
///     amplitude: 1.0,
///     duration: 2.0,
///     fs: 1000.0,
/// })
/// .unwrap();
/// assert_eq!(clean.len(), 2000);
/// assert_eq!(clean.samples()[0], 0.0);
/// ```
pub fn sine<F>(config: SineWaveConfig<F>) -> Result<SampledSignal<F>>
where
    F: RealField + Copy,
{
    let kernel = SineWaveKernel::try_new(config)?;
    tracing::debug!(samples = kernel.num_samples(), "generating sine wave");
    SampledSignal::try_new(kernel.run_alloc()?, kernel.fs())
}
