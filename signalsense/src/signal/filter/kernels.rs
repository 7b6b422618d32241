//! Trait-first kernel wrappers for filtering primitives.

use crate::kernel::{check_out_len, Error, KernelLifecycle, Read1D, Result, Write1D};
use crate::signal::traits::{FiltFilt1D, LFilter1D, LFilterZiDesign1D};
use nalgebra::RealField;

use super::design::BaFormatFilter;
use super::lfilter::df2t_into;
use super::lfilter_zi::steady_state;
use super::FiltFiltPad;

/// Constructor config for [`LFilterKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterConfig<T> {
    /// Numerator coefficients.
    pub b: Vec<T>,
    /// Denominator coefficients.
    pub a: Vec<T>,
    /// Optional initial delay values, `max(len(a), len(b)) - 1` of them.
    pub zi: Option<Vec<T>>,
}

/// 1D `lfilter` kernel over the transposed direct-form II structure.
///
/// Every run starts from the configured initial state; the kernel itself is
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterKernel<T> {
    ba: BaFormatFilter<T>,
    zi: Option<Vec<T>>,
}

impl<T> KernelLifecycle for LFilterKernel<T>
where
    T: RealField + Copy,
{
    type Config = LFilterConfig<T>;

    fn try_new(config: Self::Config) -> Result<Self> {
        let ba = BaFormatFilter::try_new(config.b, config.a)?;
        if let Some(zi) = &config.zi {
            check_out_len("zi", ba.ntaps() - 1, zi.len())?;
        }
        Ok(Self { ba, zi: config.zi })
    }
}

impl<T> LFilterKernel<T>
where
    T: RealField + Copy,
{
    fn initial_state(&self) -> Vec<T> {
        self.zi
            .clone()
            .unwrap_or_else(|| vec![T::zero(); self.ba.ntaps() - 1])
    }

    /// Filter `input` and also return the final delay values.
    pub fn run_with_state<I>(&self, input: &I) -> Result<(Vec<T>, Vec<T>)>
    where
        I: Read1D<T> + ?Sized,
    {
        let x = input.read_slice()?;
        let mut z = self.initial_state();
        let mut y = vec![T::zero(); x.len()];
        df2t_into(self.ba.b(), self.ba.a(), x, &mut z, &mut y);
        Ok((y, z))
    }
}

impl<T> LFilter1D<T> for LFilterKernel<T>
where
    T: RealField + Copy,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized,
    {
        let x = input.read_slice()?;
        let out = out.write_slice_mut()?;
        check_out_len("out", x.len(), out.len())?;
        let mut z = self.initial_state();
        df2t_into(self.ba.b(), self.ba.a(), x, &mut z, out);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>>
    where
        I: Read1D<T> + ?Sized,
    {
        Ok(self.run_with_state(input)?.0)
    }
}

/// Constructor config for [`LFilterZiKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterZiConfig<T> {
    /// Numerator coefficients.
    pub b: Vec<T>,
    /// Denominator coefficients.
    pub a: Vec<T>,
}

/// Step-response steady-state design kernel.
#[derive(Debug, Clone, PartialEq)]
pub struct LFilterZiKernel<T> {
    ba: BaFormatFilter<T>,
}

impl<T> KernelLifecycle for LFilterZiKernel<T>
where
    T: RealField + Copy,
{
    type Config = LFilterZiConfig<T>;

    fn try_new(config: Self::Config) -> Result<Self> {
        Ok(Self {
            ba: BaFormatFilter::try_new(config.b, config.a)?,
        })
    }
}

impl<T> LFilterZiDesign1D<T> for LFilterZiKernel<T>
where
    T: RealField + Copy,
{
    fn run_into<O>(&self, out: &mut O) -> Result<()>
    where
        O: Write1D<T> + ?Sized,
    {
        let out = out.write_slice_mut()?;
        check_out_len("out", self.ba.ntaps() - 1, out.len())?;
        out.copy_from_slice(&steady_state(&self.ba)?);
        Ok(())
    }

    fn run_alloc(&self) -> Result<Vec<T>> {
        steady_state(&self.ba)
    }
}

/// Constructor config for [`FiltFiltKernel`].
#[derive(Debug, Clone, PartialEq)]
pub struct FiltFiltConfig<T> {
    /// Numerator coefficients.
    pub b: Vec<T>,
    /// Denominator coefficients.
    pub a: Vec<T>,
    /// Optional padding policy. `None` disables edge extension.
    pub padding: Option<FiltFiltPad>,
}

/// 1D zero-phase forward-backward filter.
///
/// The steady-state initial condition is solved once at construction, so a
/// filter without one (a pole at `z = 1`) is rejected up front.
#[derive(Debug, Clone, PartialEq)]
pub struct FiltFiltKernel<T> {
    ba: BaFormatFilter<T>,
    zi: Vec<T>,
    padding: Option<FiltFiltPad>,
}

impl<T> KernelLifecycle for FiltFiltKernel<T>
where
    T: RealField + Copy,
{
    type Config = FiltFiltConfig<T>;

    fn try_new(config: Self::Config) -> Result<Self> {
        Self::from_filter(
            BaFormatFilter::try_new(config.b, config.a)?,
            config.padding,
        )
    }
}

impl<T> FiltFiltKernel<T>
where
    T: RealField + Copy,
{
    /// Build from already validated coefficients.
    ///
    /// Fails with [`Error::UnstableFilter`] when `a` has a root on or outside
    /// the unit circle.
    pub fn from_filter(ba: BaFormatFilter<T>, padding: Option<FiltFiltPad>) -> Result<Self> {
        if !ba.is_stable() {
            return Err(Error::UnstableFilter);
        }
        let zi = steady_state(&ba)?;
        Ok(Self { ba, zi, padding })
    }

    /// Shortest accepted input, `max(len(a), len(b))`.
    pub fn min_len(&self) -> usize {
        self.ba.ntaps()
    }

    fn pass(&self, x: &[T], y: &mut [T]) {
        let Some(&x0) = x.first() else {
            return;
        };
        let mut z = self.zi.iter().map(|zi| *zi * x0).collect::<Vec<_>>();
        df2t_into(self.ba.b(), self.ba.a(), x, &mut z, y);
    }
}

impl<T> FiltFilt1D<T> for FiltFiltKernel<T>
where
    T: RealField + Copy,
{
    fn run_into<I, O>(&self, input: &I, out: &mut O) -> Result<()>
    where
        I: Read1D<T> + ?Sized,
        O: Write1D<T> + ?Sized,
    {
        let y = self.run_alloc(input)?;
        let out = out.write_slice_mut()?;
        check_out_len("out", y.len(), out.len())?;
        out.copy_from_slice(&y);
        Ok(())
    }

    fn run_alloc<I>(&self, input: &I) -> Result<Vec<T>>
    where
        I: Read1D<T> + ?Sized,
    {
        let x = input.read_slice()?;
        if x.len() < self.min_len() {
            return Err(Error::SignalTooShortForFiltering {
                len: x.len(),
                min_len: self.min_len(),
            });
        }
        let (edge, ext) = match self.padding {
            None => (0, x.to_vec()),
            Some(pad) => {
                let edge = pad.resolve(x.len(), self.ba.ntaps())?;
                (edge, pad.pad_type.ext(x, edge)?)
            }
        };
        tracing::debug!(samples = x.len(), padlen = edge, order = self.ba.order(), "filtfilt");

        let mut forward = vec![T::zero(); ext.len()];
        self.pass(&ext, &mut forward);
        forward.reverse();
        let mut backward = vec![T::zero(); ext.len()];
        self.pass(&forward, &mut backward);
        backward.reverse();

        let y = backward[edge..edge + x.len()].to_vec();
        if y.iter().any(|v| !v.is_finite()) {
            return Err(Error::NonFiniteOutput);
        }
        Ok(y)
    }
}
