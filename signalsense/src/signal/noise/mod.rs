use crate::kernel::{KernelLifecycle, Result};
use crate::signal::traits::NoiseInject1D;
use crate::signal::SampledSignal;
use nalgebra::RealField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod kernels;
pub use kernels::*;

/// Add white Gaussian noise with standard deviation `sigma` to `signal`.
///
/// Each sample gains an independent draw from `N(0, sigma^2)` taken from
/// `rng`. The input is left untouched; the result has the same length and
/// sample rate. With `sigma == 0` the result is an exact copy and `rng` is not
/// advanced.
///
/// `rng` is borrowed mutably for the duration of the call. To share one
/// generator between threads wrap it in a lock; there is no internal
/// synchronization.
///
/// # Errors
/// [`Error::InvalidNoiseLevel`](crate::kernel::Error::InvalidNoiseLevel) for a
/// negative or non-finite `sigma`.
pub fn add_noise<F, R>(
    signal: &SampledSignal<F>,
    sigma: F,
    rng: &mut R,
) -> Result<SampledSignal<F>>
where
    F: RealField + Copy,
    R: Rng + ?Sized,
{
    let kernel = GaussianNoiseKernel::try_new(GaussianNoiseConfig { sigma })?;
    tracing::debug!(samples = signal.len(), "adding gaussian noise");
    Ok(signal.with_samples(kernel.run_alloc(rng, signal)?))
}

/// [`add_noise`] with a [`StdRng`] seeded from `seed`.
///
/// The same `seed`, signal and `sigma` always produce the same output.
///
/// # Example
/// ```
/// use signalsense::signal::noise::add_noise_seeded;
/// use signalsense::signal::SampledSignal;
///
/// let clean = SampledSignal::try_new(vec![0.0f64; 8], 8.0).unwrap();
/// let a = add_noise_seeded(&clean, 0.5, 42).unwrap();
/// let b = add_noise_seeded(&clean, 0.5, 42).unwrap();
/// assert_eq!(a, b);
/// ```
pub fn add_noise_seeded<F>(
    signal: &SampledSignal<F>,
    sigma: F,
    seed: u64,
) -> Result<SampledSignal<F>>
where
    F: RealField + Copy,
{
    add_noise(signal, sigma, &mut StdRng::seed_from_u64(seed))
}
