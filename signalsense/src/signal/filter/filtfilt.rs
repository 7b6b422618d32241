use crate::kernel::{Error, KernelLifecycle, Result};
use crate::signal::traits::FiltFilt1D;
use crate::signal::SampledSignal;
use nalgebra::RealField;

use super::design::BaFormatFilter;
use super::{FiltFiltConfig, FiltFiltKernel};

/// Padding utilised in [filtfilt].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FiltFiltPadType {
    /// Odd extensions
    #[default]
    Odd,
    /// Even extensions
    Even,
    /// Constant extensions
    Const,
}

impl FiltFiltPadType {
    /// Extend `x` by `n` samples at each end.
    ///
    /// ## Type of extension
    /// * odd: point-symmetric about each end sample, `2 x[0] - x[i]`.
    /// * even: mirrored about each end sample, `x[i]`.
    /// * const: the end sample repeated.
    ///
    /// # Errors
    /// [`Error::InvalidArg`] when `n >= len(x)`.
    pub fn ext<F>(&self, x: &[F], n: usize) -> Result<Vec<F>>
    where
        F: RealField + Copy,
    {
        if n < 1 {
            return Ok(x.to_vec());
        }
        if n >= x.len() {
            return Err(Error::InvalidArg {
                arg: "n",
                reason: "extension of array cannot be as long as the array",
            });
        }

        let first = x[0];
        let last = x[x.len() - 1];
        let two = F::one() + F::one();
        let left = x[1..=n].iter().rev();
        let right = x[x.len() - 1 - n..x.len() - 1].iter().rev();

        let mut out = Vec::with_capacity(x.len() + 2 * n);
        match self {
            FiltFiltPadType::Odd => {
                out.extend(left.map(|v| two * first - *v));
                out.extend_from_slice(x);
                out.extend(right.map(|v| two * last - *v));
            }
            FiltFiltPadType::Even => {
                out.extend(left.copied());
                out.extend_from_slice(x);
                out.extend(right.copied());
            }
            FiltFiltPadType::Const => {
                out.extend(core::iter::repeat(first).take(n));
                out.extend_from_slice(x);
                out.extend(core::iter::repeat(last).take(n));
            }
        }
        Ok(out)
    }
}

/// Arguments for [filtfilt].
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FiltFiltPad {
    /// Padding type.
    pub pad_type: FiltFiltPadType,
    /// Length of padding. `None` selects `min(3 * ntaps, len(x) - 1)`.
    pub len: Option<usize>,
}

impl FiltFiltPad {
    /// Resolve the number of samples added at each end of a signal of
    /// length `len` for a filter with `ntaps` coefficients.
    pub(crate) fn resolve(&self, len: usize, ntaps: usize) -> Result<usize> {
        match self.len {
            Some(n) if n >= len => Err(Error::InvalidArg {
                arg: "padlen",
                reason: "the length of the input must be greater than padlen",
            }),
            Some(n) => Ok(n),
            None => Ok((3 * ntaps).min(len.saturating_sub(1))),
        }
    }
}

/// Apply a digital filter forward and backward to a signal.
///
/// This function applies a linear digital filter twice, once forward and
/// once backwards. The combined filter has zero phase and a magnitude
/// response equal to the square of the original's, so nothing is ever
/// amplified by a filter whose gain stays at or below one.
///
/// # Parameters
/// * `b`: The numerator coefficient vector of the filter.
/// * `a`: The denominator coefficient vector of the filter. If `a[0]` is not
///   1, then both `a` and `b` are normalized by `a[0]`.
/// * `x`: The data to be filtered.
/// * `padding`: [Option::None] here denotes a deliberate absence of padding.
///   * `pad_type` [FiltFiltPadType], default odd.
///   * `len`: samples added at both ends. [Option::None] selects
///     `min(3 * max(len(a), len(b)), len(x) - 1)`.
///
/// # Returns
/// The filtered output with the same length as `x`.
///
/// # Errors
/// * [`Error::SignalTooShortForFiltering`] when `x` is shorter than
///   `max(len(a), len(b))`.
/// * [`Error::InvalidArg`] for invalid coefficients or an explicit pad length
///   that is not below `len(x)`.
/// * [`Error::UnstableFilter`] when `a` has a root on or outside the unit
///   circle.
/// * [`Error::NonFiniteOutput`] when the result holds NaN or infinite
///   samples, for example from a NaN in `x`.
///
/// # Notes
/// On both passes the initial condition of the filter is found with
/// [`lfilter_zi`](super::lfilter_zi), scaled by the end point of the extended
/// data.
///
/// # Example
/// ```
/// use signalsense::signal::filter::{filtfilt, FiltFiltPad};
///
/// let b = [0.5_f64, 0.5];
/// let a = [1.];
/// let x = [0., 0.6389613, 0.890577, 0.9830277, 0.9992535, 0.9756868, 0.9304659, 0.8734051];
/// let y = filtfilt(&b, &a, &x, Some(FiltFiltPad::default())).unwrap();
/// assert_eq!(y.len(), x.len());
/// assert!((y[1] - 0.5421249).abs() < 1e-6);
/// ```
pub fn filtfilt<F>(b: &[F], a: &[F], x: &[F], padding: Option<FiltFiltPad>) -> Result<Vec<F>>
where
    F: RealField + Copy,
{
    FiltFiltKernel::try_new(FiltFiltConfig {
        b: b.to_vec(),
        a: a.to_vec(),
        padding,
    })?
    .run_alloc(x)
}

/// Zero-phase filter `signal` with designed coefficients and default odd
/// padding.
///
/// The result has the same length and sample rate as `signal`.
///
/// # Errors
/// [`Error::SignalTooShortForFiltering`] when `signal` has fewer samples than
/// the filter has taps, plus the stability and finiteness errors of
/// [`filtfilt`].
pub fn filtfilt_signal<F>(
    ba: &BaFormatFilter<F>,
    signal: &SampledSignal<F>,
) -> Result<SampledSignal<F>>
where
    F: RealField + Copy,
{
    let kernel = FiltFiltKernel::from_filter(ba.clone(), Some(FiltFiltPad::default()))?;
    Ok(signal.with_samples(kernel.run_alloc(signal)?))
}
