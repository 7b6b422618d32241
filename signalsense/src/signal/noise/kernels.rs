//! Trait-first kernels for additive noise.

use crate::kernel::{check_out_len, Error, KernelLifecycle, Read1D, Result, Write1D};
use crate::signal::traits::NoiseInject1D;
use nalgebra::RealField;
use rand::Rng;

/// Draw one standard normal variate with the Box-Muller transform.
pub(crate) fn standard_normal<R>(rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    // u1 in (0, 1] keeps ln(u1) finite.
    let u1 = 1.0 - rng.random::<f64>();
    let u2 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (core::f64::consts::TAU * u2).cos()
}

/// Constructor config for [`GaussianNoiseKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoiseConfig<F> {
    /// Standard deviation of the additive noise, `>= 0`.
    pub sigma: F,
}

/// Additive zero-mean white Gaussian noise.
///
/// A kernel holds no generator; every run borrows the caller's RNG, so the
/// same seed always reproduces the same perturbation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianNoiseKernel<F> {
    sigma: F,
}

impl<F> GaussianNoiseKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured standard deviation.
    pub fn sigma(&self) -> F {
        self.sigma
    }

    fn perturb<R>(&self, rng: &mut R, x: F) -> F
    where
        R: Rng + ?Sized,
    {
        x + self.sigma * nalgebra::convert::<f64, F>(standard_normal(rng))
    }
}

impl<F> KernelLifecycle for GaussianNoiseKernel<F>
where
    F: RealField + Copy,
{
    type Config = GaussianNoiseConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self> {
        if !config.sigma.is_finite() || config.sigma < F::zero() {
            return Err(Error::InvalidNoiseLevel);
        }
        Ok(Self {
            sigma: config.sigma,
        })
    }
}

impl<F> NoiseInject1D<F> for GaussianNoiseKernel<F>
where
    F: RealField + Copy,
{
    fn run_into<R, I, O>(&self, rng: &mut R, input: &I, out: &mut O) -> Result<()>
    where
        R: Rng + ?Sized,
        I: Read1D<F> + ?Sized,
        O: Write1D<F> + ?Sized,
    {
        let input = input.read_slice()?;
        let out = out.write_slice_mut()?;
        check_out_len("out", input.len(), out.len())?;
        if self.sigma == F::zero() {
            out.copy_from_slice(input);
            return Ok(());
        }
        out.iter_mut()
            .zip(input.iter())
            .for_each(|(y, x)| *y = self.perturb(rng, *x));
        Ok(())
    }

    fn run_alloc<R, I>(&self, rng: &mut R, input: &I) -> Result<Vec<F>>
    where
        R: Rng + ?Sized,
        I: Read1D<F> + ?Sized,
    {
        let input = input.read_slice()?;
        if self.sigma == F::zero() {
            return Ok(input.to_vec());
        }
        Ok(input.iter().map(|x| self.perturb(rng, *x)).collect())
    }
}
