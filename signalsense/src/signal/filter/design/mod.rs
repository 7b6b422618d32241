//! Digital Butterworth low-pass design through an analog prototype,
//! frequency pre-warping and the bilinear transform.

use crate::kernel::{Error, KernelLifecycle, Result};
use crate::signal::traits::{ComplexPairSplit, IirDesign};
use nalgebra::{Complex, RealField};
use signalsense_core::num_rs::poly_from_conjugate_roots;

mod kernels;
pub use kernels::*;

/// Transfer-function (`b`, `a`) representation of a digital filter.
///
/// `b` is the feed-forward (numerator) and `a` the feedback (denominator)
/// polynomial, both in powers of `z^-1`. `a[0]` is always `1` and both
/// sequences have the same length. Values are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct BaFormatFilter<F> {
    b: Vec<F>,
    a: Vec<F>,
}

impl<F> BaFormatFilter<F>
where
    F: RealField + Copy,
{
    /// Build from raw coefficients.
    ///
    /// Both sequences are divided by `a[0]`, and the shorter one is padded with
    /// trailing zeros so `b` and `a` end up the same length.
    ///
    /// # Errors
    /// [`Error::InvalidArg`] when either sequence is empty, holds a non-finite
    /// value, or `a[0] == 0`.
    pub fn try_new(mut b: Vec<F>, mut a: Vec<F>) -> Result<Self> {
        if b.is_empty() {
            return Err(Error::InvalidArg {
                arg: "b",
                reason: "numerator must be non-empty",
            });
        }
        if a.is_empty() {
            return Err(Error::InvalidArg {
                arg: "a",
                reason: "denominator must be non-empty",
            });
        }
        if b.iter().chain(a.iter()).any(|c| !c.is_finite()) {
            return Err(Error::InvalidArg {
                arg: "b/a",
                reason: "coefficients must be finite",
            });
        }
        let a0 = a[0];
        if a0 == F::zero() {
            return Err(Error::InvalidArg {
                arg: "a",
                reason: "a[0] must be non-zero",
            });
        }
        if a0 != F::one() {
            b.iter_mut().for_each(|c| *c /= a0);
            a.iter_mut().for_each(|c| *c /= a0);
        }
        let n = b.len().max(a.len());
        b.resize(n, F::zero());
        a.resize(n, F::zero());
        Ok(Self { b, a })
    }

    /// Feed-forward coefficients.
    pub fn b(&self) -> &[F] {
        &self.b
    }

    /// Feedback coefficients, `a[0] == 1`.
    pub fn a(&self) -> &[F] {
        &self.a
    }

    /// Filter order, `len - 1`.
    pub fn order(&self) -> usize {
        self.a.len() - 1
    }

    /// Number of taps, `max(len(b), len(a))`.
    pub fn ntaps(&self) -> usize {
        self.a.len()
    }

    /// Zero-frequency gain `sum(b) / sum(a)`, the response at `z = 1`.
    pub fn dc_gain(&self) -> F {
        let sb = self.b.iter().fold(F::zero(), |acc, c| acc + *c);
        let sa = self.a.iter().fold(F::zero(), |acc, c| acc + *c);
        sb / sa
    }

    /// Whether every root of `a` lies strictly inside the unit circle.
    ///
    /// Runs the Schur-Cohn step-down recursion: the filter is stable exactly
    /// when every reflection coefficient has magnitude below one.
    pub fn is_stable(&self) -> bool {
        let mut a = self.a.clone();
        // Trailing zeros are roots at the origin.
        while a.len() > 1 && a[a.len() - 1] == F::zero() {
            a.pop();
        }
        while a.len() > 1 {
            let m = a.len() - 1;
            let k = a[m] / a[0];
            if !(k.abs() < F::one()) {
                return false;
            }
            a = (0..m).map(|i| a[i] - k * a[m - i]).collect();
        }
        true
    }

    /// Frequency response on `wor_n` points of `[0, pi)`, see
    /// [`freqz`](crate::signal::spectral::freqz).
    pub fn freqz(&self, wor_n: usize) -> (Vec<F>, Vec<Complex<F>>) {
        crate::signal::spectral::freqz(self, wor_n)
    }

    /// Consume into `(b, a)`.
    pub fn into_parts(self) -> (Vec<F>, Vec<F>) {
        (self.b, self.a)
    }
}

/// Zeros, poles and gain of a filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ZpkFormatFilter<F> {
    /// Zeros.
    pub z: Vec<Complex<F>>,
    /// Poles.
    pub p: Vec<Complex<F>>,
    /// System gain.
    pub k: F,
}

/// Analog Butterworth low-pass prototype with unit cutoff.
///
/// Returns `n` poles `exp(i * theta_k)`, `theta_k = pi/2 + (2k + 1) pi / (2n)`,
/// all in the left half plane, with conjugates at `k` and `n - 1 - k`. The
/// middle pole of an odd order is placed exactly at `-1`. The prototype has no
/// finite zeros and unit gain.
pub fn buttap<F>(n: usize) -> Vec<Complex<F>>
where
    F: RealField + Copy,
{
    let denom = nalgebra::convert::<f64, F>((2 * n) as f64);
    (0..n)
        .map(|k| {
            if 2 * k + 1 == n {
                return Complex::new(-F::one(), F::zero());
            }
            let theta =
                F::frac_pi_2() + F::pi() * nalgebra::convert::<f64, F>((2 * k + 1) as f64) / denom;
            Complex::new(theta.cos(), theta.sin())
        })
        .collect()
}

/// Bilinear transform `s = (z - 1) / (z + 1)` of an analog zpk system.
///
/// Uses the sampling interval `T = 2` convention, matching the pre-warp
/// `tan(pi * Wn / 2)`. Each analog root `r` maps to `(1 + r) / (1 - r)`; the
/// `len(p) - len(z)` zeros at infinity land on `z = -1`.
pub fn bilinear_zpk<F>(zpk: &ZpkFormatFilter<F>) -> Result<ZpkFormatFilter<F>>
where
    F: RealField + Copy,
{
    if zpk.z.len() > zpk.p.len() {
        return Err(Error::InvalidArg {
            arg: "zpk",
            reason: "improper transfer function; poles must be >= zeros",
        });
    }
    let one = Complex::new(F::one(), F::zero());
    let map = |r: &Complex<F>| (one + *r) / (one - *r);

    let mut z = zpk.z.iter().map(map).collect::<Vec<_>>();
    z.resize(zpk.p.len(), -one);
    let p = zpk.p.iter().map(map).collect::<Vec<_>>();

    // H(z) = k * prod(1 - z_a) / prod(1 - p_a) * prod(z - z_d) / prod(z - p_d)
    let num = zpk.z.iter().fold(one, |acc, r| acc * (one - *r));
    let den = zpk.p.iter().fold(one, |acc, r| acc * (one - *r));
    let k = zpk.k * (num / den).re;

    Ok(ZpkFormatFilter { z, p, k })
}

/// Expand a zpk system into real `b`, `a` coefficients.
///
/// Roots are paired with their conjugates through `pairing` before
/// expansion, so the polynomials are real by construction. `b` is scaled by
/// the zpk gain.
pub fn zpk2tf<F, S>(zpk: &ZpkFormatFilter<F>, pairing: &S) -> Result<BaFormatFilter<F>>
where
    F: RealField + Copy,
    S: ComplexPairSplit<F>,
{
    let (zc, zr) = pairing.run_alloc(&zpk.z)?;
    let (pc, pr) = pairing.run_alloc(&zpk.p)?;
    let b = poly_from_conjugate_roots(&zc, &zr)
        .into_iter()
        .map(|c| c * zpk.k)
        .collect();
    BaFormatFilter::try_new(b, poly_from_conjugate_roots(&pc, &pr))
}

/// Design a digital Butterworth low-pass filter.
///
/// `order` poles, `-3 dB` at `cutoff` Hz for a sample rate of `fs` Hz.
/// Returns `b` and `a` of length `order + 1` with `a[0] == 1` and unit gain at
/// DC. Identical inputs always give bit-identical coefficients.
///
/// # Errors
/// * [`Error::InvalidOrder`] for `order == 0`.
/// * [`Error::CutoffAboveNyquist`] for `cutoff >= fs / 2`.
/// * [`Error::InvalidArg`] for a non-positive `cutoff` or `fs`.
/// * [`Error::IllConditionedFilter`] when the rounded coefficients leave the
///   filter unstable or lift its power gain above one by more than
///   [`MAX_GAIN_EXCESS`]. High orders at low normalized cutoffs hit this, for
///   example order 10 at 1 Hz for 1000 Hz sampling.
///
/// # Example
/// ```
/// use signalsense::signal::filter::design::butter_lowpass;
///
/// let ba = butter_lowpass(4, 10.0_f64, 1000.0).unwrap();
/// assert_eq!(ba.b().len(), 5);
/// assert_eq!(ba.a()[0], 1.0);
/// assert!((ba.dc_gain() - 1.0).abs() < 1e-9);
/// ```
pub fn butter_lowpass<F>(order: usize, cutoff: F, fs: F) -> Result<BaFormatFilter<F>>
where
    F: RealField + Copy,
{
    let kernel = ButterLowpassKernel::try_new(ButterLowpassConfig { order, cutoff, fs })?;
    tracing::debug!(order, "designing butterworth low-pass");
    kernel.run_alloc()
}

/// [`butter_lowpass`] in zeros/poles/gain form.
pub fn butter_lowpass_zpk<F>(order: usize, cutoff: F, fs: F) -> Result<ZpkFormatFilter<F>>
where
    F: RealField + Copy,
{
    ButterLowpassKernel::try_new(ButterLowpassConfig { order, cutoff, fs })?.run_zpk()
}
