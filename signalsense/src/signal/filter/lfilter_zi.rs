use crate::kernel::{Error, KernelLifecycle, Result};
use crate::linalg::companion;
use crate::signal::traits::LFilterZiDesign1D;
use nalgebra::{DMatrix, DVector, RealField};

use super::design::BaFormatFilter;
use super::{LFilterZiConfig, LFilterZiKernel};

/// Solve `(I - A^T) zi = b[1:] - a[1:] b[0]` for the steady-state delay values
/// of a step response, `A` being the companion matrix of `a`.
pub(crate) fn steady_state<F>(ba: &BaFormatFilter<F>) -> Result<Vec<F>>
where
    F: RealField + Copy,
{
    let (b, a) = (ba.b(), ba.a());
    let n = ba.ntaps();
    if n == 1 {
        return Ok(Vec::new());
    }
    let i_minus_a = DMatrix::<F>::identity(n - 1, n - 1) - companion(a)?.transpose();
    let rhs = DVector::from_iterator(
        n - 1,
        b.iter().zip(a.iter()).skip(1).map(|(bi, ai)| *bi - *ai * b[0]),
    );
    let zi = i_minus_a.lu().solve(&rhs).ok_or(Error::InvalidArg {
        arg: "a",
        reason: "filter has a pole at z = 1; no steady state exists",
    })?;
    Ok(zi.iter().copied().collect())
}

/// Construct initial conditions for [`lfilter`](super::lfilter) for step
/// response steady-state.
///
/// Returns the `max(len(a), len(b)) - 1` delay values which, scaled by a
/// constant input level, start the filter as if that input had been applied
/// forever.
///
/// # Errors
/// [`Error::InvalidArg`] for invalid coefficients or a filter without a
/// steady state (a pole at `z = 1`).
///
/// # Example
/// ```
/// use signalsense::signal::filter::{lfilter, lfilter_zi};
///
/// let b = [0.5_f64, 0.5];
/// let a = [1.0, -0.2];
/// let zi = lfilter_zi(&b, &a).unwrap();
/// // With input held at 1 the output stays at the DC gain of 1.25.
/// let (y, _) = lfilter(&b, &a, &[1.0; 4], Some(zi.as_slice())).unwrap();
/// assert!(y.iter().all(|v| (v - 1.25).abs() < 1e-12));
/// ```
pub fn lfilter_zi<F>(b: &[F], a: &[F]) -> Result<Vec<F>>
where
    F: RealField + Copy,
{
    LFilterZiKernel::try_new(LFilterZiConfig {
        b: b.to_vec(),
        a: a.to_vec(),
    })?
    .run_alloc()
}
