use crate::kernel::{KernelLifecycle, Result};
use nalgebra::RealField;

use super::{LFilterConfig, LFilterKernel};

/// One pass of the transposed direct-form II difference equation.
///
/// `b` and `a` must have the same length `n` with `a[0] == 1`, `z` holds the
/// `n - 1` delay values and is left at the final state, `y` must match `x`.
pub(crate) fn df2t_into<F>(b: &[F], a: &[F], x: &[F], z: &mut [F], y: &mut [F])
where
    F: RealField + Copy,
{
    let n = b.len();
    debug_assert_eq!(n, a.len());
    debug_assert_eq!(z.len() + 1, n);
    debug_assert_eq!(x.len(), y.len());

    if n == 1 {
        y.iter_mut().zip(x).for_each(|(yk, xk)| *yk = b[0] * *xk);
        return;
    }
    for (yk, &xk) in y.iter_mut().zip(x) {
        let out = b[0] * xk + z[0];
        for i in 0..n - 2 {
            z[i] = b[i + 1] * xk + z[i + 1] - a[i + 1] * out;
        }
        z[n - 2] = b[n - 1] * xk - a[n - 1] * out;
        *yk = out;
    }
}

/// Filter `x` with the IIR or FIR filter `b`/`a`.
///
/// Implements the transposed direct-form II difference equation
///
/// ```text
/// a[0] y[k] = b[0] x[k] + ... + b[M] x[k-M] - a[1] y[k-1] - ... - a[N] y[k-N]
/// ```
///
/// Coefficients are normalized by `a[0]` and the shorter sequence is
/// zero-padded. `zi` holds the initial delay values, `max(len(a), len(b)) - 1`
/// of them; `None` starts at rest. Returns the output and the final delay
/// values `zf`.
///
/// # Errors
/// * [`Error::InvalidArg`](crate::kernel::Error::InvalidArg) for empty
///   coefficients or `a[0] == 0`.
/// * [`Error::LengthMismatch`](crate::kernel::Error::LengthMismatch) for a
///   wrongly sized `zi`.
///
/// # Example
/// ```
/// use signalsense::signal::filter::lfilter;
///
/// let b = [5., 4., 1., 2.];
/// let a = [1.];
/// let x = [1., 2., 3., 4., 3., 5., 6.];
/// let (y, _) = lfilter(&b, &a, &x, None).unwrap();
/// assert_eq!(y, vec![5., 14., 24., 36., 38., 47., 61.]);
/// ```
pub fn lfilter<F>(b: &[F], a: &[F], x: &[F], zi: Option<&[F]>) -> Result<(Vec<F>, Vec<F>)>
where
    F: RealField + Copy,
{
    let kernel = LFilterKernel::try_new(LFilterConfig {
        b: b.to_vec(),
        a: a.to_vec(),
        zi: zi.map(<[F]>::to_vec),
    })?;
    kernel.run_with_state(x)
}
