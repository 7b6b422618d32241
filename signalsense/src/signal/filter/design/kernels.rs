//! Trait-first kernels for filter design APIs.

use crate::kernel::{Error, KernelLifecycle, Result};
use crate::signal::traits::{ComplexPairSplit, ComplexSplit, IirDesign};
use core::cmp::Ordering;
use nalgebra::{Complex, RealField};
use signalsense_core::num_rs::polyval_complex;

use super::{bilinear_zpk, buttap, zpk2tf, BaFormatFilter, ZpkFormatFilter};

/// Constructor config for [`CplxRealKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CplxRealConfig<F> {
    /// Absolute pairing tolerance. `None` scales `100 * eps` by each root's modulus.
    pub tol: Option<F>,
}

/// Split roots into conjugate pairs and purely real roots.
///
/// A root whose imaginary part lies within tolerance of zero is real. Every
/// other root must find a partner with the same real part and negated
/// imaginary part; the pair is reported once, as the average with a positive
/// imaginary part. Complex pairs come out sorted by real part, reals sorted
/// ascending.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CplxRealKernel<F> {
    tol: Option<F>,
}

impl<F> Default for CplxRealKernel<F> {
    fn default() -> Self {
        Self { tol: None }
    }
}

impl<F> KernelLifecycle for CplxRealKernel<F>
where
    F: RealField + Copy,
{
    type Config = CplxRealConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self> {
        if let Some(tol) = config.tol {
            if !tol.is_finite() || tol < F::zero() {
                return Err(Error::InvalidArg {
                    arg: "tol",
                    reason: "tolerance must be finite and >= 0",
                });
            }
        }
        Ok(Self { tol: config.tol })
    }
}

impl<F> CplxRealKernel<F>
where
    F: RealField + Copy,
{
    fn tol_for(&self, z: &Complex<F>) -> F {
        self.tol.unwrap_or_else(|| {
            let scale = (z.re * z.re + z.im * z.im).sqrt().max(F::one());
            nalgebra::convert::<f64, F>(100.0) * F::default_epsilon() * scale
        })
    }
}

fn by_real_then_imag<F: RealField + Copy>(l: &Complex<F>, r: &Complex<F>) -> Ordering {
    l.re.partial_cmp(&r.re)
        .unwrap_or(Ordering::Equal)
        .then(l.im.partial_cmp(&r.im).unwrap_or(Ordering::Equal))
}

impl<F> ComplexPairSplit<F> for CplxRealKernel<F>
where
    F: RealField + Copy,
{
    fn run_alloc(&self, roots: &[Complex<F>]) -> Result<ComplexSplit<F>> {
        let mut reals = Vec::new();
        let mut upper = Vec::new();
        let mut lower = Vec::new();
        for z in roots {
            if !z.re.is_finite() || !z.im.is_finite() {
                return Err(Error::InvalidArg {
                    arg: "roots",
                    reason: "roots must be finite",
                });
            }
            if z.im.abs() <= self.tol_for(z) {
                reals.push(z.re);
            } else if z.im > F::zero() {
                upper.push(*z);
            } else {
                lower.push(*z);
            }
        }
        if upper.len() != lower.len() {
            return Err(Error::InvalidArg {
                arg: "roots",
                reason: "complex roots must come in conjugate pairs",
            });
        }

        upper.sort_by(by_real_then_imag);
        let mut pairs = Vec::with_capacity(upper.len());
        for z in upper {
            let tol = self.tol_for(&z);
            let partner = lower
                .iter()
                .enumerate()
                .filter(|(_, c)| (c.re - z.re).abs() <= tol && (c.im + z.im).abs() <= tol)
                .min_by(|(_, l), (_, r)| {
                    let dl = (l.re - z.re).abs() + (l.im + z.im).abs();
                    let dr = (r.re - z.re).abs() + (r.im + z.im).abs();
                    dl.partial_cmp(&dr).unwrap_or(Ordering::Equal)
                })
                .map(|(i, _)| i)
                .ok_or(Error::InvalidArg {
                    arg: "roots",
                    reason: "complex root has no conjugate partner",
                })?;
            let c = lower.swap_remove(partner);
            let half = nalgebra::convert::<f64, F>(0.5);
            pairs.push(Complex::new((z.re + c.re) * half, (z.im - c.im) * half));
        }
        reals.sort_by(|l, r| l.partial_cmp(r).unwrap_or(Ordering::Equal));
        Ok((pairs, reals))
    }
}

/// Constructor config for [`ButterLowpassKernel`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ButterLowpassConfig<F> {
    /// Number of poles, `>= 1`.
    pub order: usize,
    /// `-3 dB` frequency in Hz, `0 < cutoff < fs / 2`.
    pub cutoff: F,
    /// Sample rate in Hz.
    pub fs: F,
}

/// Trait-first digital Butterworth low-pass design kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ButterLowpassKernel<F> {
    order: usize,
    wn: F,
}

impl<F> KernelLifecycle for ButterLowpassKernel<F>
where
    F: RealField + Copy,
{
    type Config = ButterLowpassConfig<F>;

    fn try_new(config: Self::Config) -> Result<Self> {
        let ButterLowpassConfig { order, cutoff, fs } = config;
        if order == 0 {
            return Err(Error::InvalidOrder { order });
        }
        if !fs.is_finite() || fs <= F::zero() {
            return Err(Error::InvalidArg {
                arg: "fs",
                reason: "sample rate must be finite and > 0",
            });
        }
        if !cutoff.is_finite() || cutoff <= F::zero() {
            return Err(Error::InvalidArg {
                arg: "cutoff",
                reason: "cutoff must be finite and > 0",
            });
        }
        let nyquist = fs / (F::one() + F::one());
        if cutoff >= nyquist {
            return Err(Error::CutoffAboveNyquist);
        }
        Ok(Self {
            order,
            wn: cutoff / nyquist,
        })
    }
}

impl<F> ButterLowpassKernel<F>
where
    F: RealField + Copy,
{
    /// Return configured order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Cutoff normalized to the Nyquist frequency, in `(0, 1)`.
    pub fn normalized_cutoff(&self) -> F {
        self.wn
    }

    /// Design the filter and return its digital zeros, poles and gain.
    pub fn run_zpk(&self) -> Result<ZpkFormatFilter<F>> {
        let warped = (F::frac_pi_2() * self.wn).tan();
        let p = buttap::<F>(self.order)
            .into_iter()
            .map(|pole| pole * warped)
            .collect::<Vec<_>>();
        let k = (0..self.order).fold(F::one(), |acc, _| acc * warped);
        let digital = bilinear_zpk(&ZpkFormatFilter { z: vec![], p, k })?;
        tracing::trace!(poles = ?digital.p, gain = ?digital.k, "butterworth digital zpk");
        Ok(digital)
    }
}

impl<F> IirDesign<F> for ButterLowpassKernel<F>
where
    F: RealField + Copy,
{
    type Output = BaFormatFilter<F>;

    fn run_alloc(&self) -> Result<Self::Output> {
        let zpk = self.run_zpk()?;
        let (b, a) = zpk2tf(&zpk, &CplxRealKernel::default())?.into_parts();

        // Unity gain at z = 1.
        let sa = a.iter().fold(F::zero(), |acc, c| acc + *c);
        let sb = b.iter().fold(F::zero(), |acc, c| acc + *c);
        let scale = sa / sb;
        let ba = BaFormatFilter::try_new(b.into_iter().map(|c| c * scale).collect(), a)?;

        let limit = F::one() + nalgebra::convert::<f64, F>(MAX_GAIN_EXCESS);
        match peak_power_gain(&ba, self.wn) {
            Some(gain) if gain <= limit && ba.is_stable() => Ok(ba),
            gain => {
                tracing::debug!(order = self.order, ?gain, "rejecting ill-conditioned design");
                Err(Error::IllConditionedFilter { order: self.order })
            }
        }
    }
}

/// Largest excess of a designed filter's power gain `|H|^2` over one that
/// [`ButterLowpassKernel`] accepts from coefficient rounding.
pub const MAX_GAIN_EXCESS: f64 = 1e-4;

/// Largest `|H|^2` on a grid that is dense up to four times the normalized
/// cutoff and coarse over the rest of `[0, pi)`. `None` if any point is not
/// finite.
fn peak_power_gain<F>(ba: &BaFormatFilter<F>, wn: F) -> Option<F>
where
    F: RealField + Copy,
{
    const POINTS: usize = 1024;
    let n = nalgebra::convert::<f64, F>(POINTS as f64);
    let four = nalgebra::convert::<f64, F>(4.0);
    let dense_edge = (four * wn).min(F::one()) * F::pi();
    (0..POINTS)
        .flat_map(|i| {
            let t = nalgebra::convert::<f64, F>(i as f64) / n;
            [t * dense_edge, t * F::pi()]
        })
        .map(|w| {
            let z = Complex::new(w.cos(), w.sin());
            (polyval_complex(ba.b(), z) / polyval_complex(ba.a(), z)).norm_sqr()
        })
        .try_fold(F::zero(), |peak, g| g.is_finite().then(|| peak.max(g)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cplxreal_pairs_conjugates_and_sorts_reals() {
        let roots = [
            Complex::new(-0.5f64, 0.25),
            Complex::new(2.0, 0.0),
            Complex::new(-0.1, -0.9),
            Complex::new(-0.5, -0.25),
            Complex::new(-1.0, 1e-17),
            Complex::new(-0.1, 0.9),
        ];
        let (pairs, reals) = CplxRealKernel::default()
            .run_alloc(&roots)
            .expect("all roots paired");
        assert_eq!(
            pairs,
            vec![Complex::new(-0.5, 0.25), Complex::new(-0.1, 0.9)]
        );
        assert_eq!(reals, vec![-1.0, 2.0]);
    }

    #[test]
    fn cplxreal_rejects_unpaired_roots() {
        let kernel = CplxRealKernel::default();
        assert!(matches!(
            kernel.run_alloc(&[Complex::new(0.3f64, 0.4)]),
            Err(Error::InvalidArg { arg: "roots", .. })
        ));
        assert!(matches!(
            kernel.run_alloc(&[Complex::new(0.3f64, 0.4), Complex::new(0.2, -0.4)]),
            Err(Error::InvalidArg { arg: "roots", .. })
        ));
    }

    #[test]
    fn cplxreal_custom_tolerance() {
        let kernel =
            CplxRealKernel::try_new(CplxRealConfig { tol: Some(1e-3) }).expect("valid tol");
        let (pairs, reals) = kernel
            .run_alloc(&[Complex::new(0.3f64, 0.4), Complex::new(0.3005, -0.4)])
            .expect("within tolerance");
        assert_eq!(reals.len(), 0);
        assert_abs_diff_eq!(pairs[0].re, 0.30025, epsilon = 1e-12);

        assert!(CplxRealKernel::try_new(CplxRealConfig { tol: Some(-1.0f64) }).is_err());
    }

    #[test]
    fn butter_kernel_normalizes_cutoff() {
        let kernel = ButterLowpassKernel::try_new(ButterLowpassConfig {
            order: 4,
            cutoff: 10.0f64,
            fs: 1000.0,
        })
        .expect("valid config");
        assert_eq!(kernel.order(), 4);
        assert_abs_diff_eq!(kernel.normalized_cutoff(), 0.02, epsilon = 1e-15);
    }

    #[test]
    fn butter_kernel_poles_are_stable_and_paired() {
        for order in 1..=8 {
            let kernel = ButterLowpassKernel::try_new(ButterLowpassConfig {
                order,
                cutoff: 30.0f64,
                fs: 200.0,
            })
            .expect("valid config");
            let zpk = kernel.run_zpk().expect("design");
            assert_eq!(zpk.p.len(), order);
            assert!(zpk.p.iter().all(|p| p.norm() < 1.0));
            let (pairs, reals) = CplxRealKernel::default()
                .run_alloc(&zpk.p)
                .expect("conjugate poles");
            assert_eq!(2 * pairs.len() + reals.len(), order);
            assert_eq!(reals.len(), order % 2);
        }
    }

    #[test]
    fn butter_kernel_designs_ba() {
        let kernel = ButterLowpassKernel::try_new(ButterLowpassConfig {
            order: 3,
            cutoff: 0.1f64,
            fs: 1.0,
        })
        .expect("butter kernel should initialize");
        let ba = kernel.run_alloc().expect("butter design should succeed");
        assert_eq!(ba.a().len(), ba.b().len());
        assert_eq!(ba.a()[0], 1.0);
        // Binomial numerator shape: [1, 3, 3, 1] * b[0]
        assert_abs_diff_eq!(ba.b()[1], 3.0 * ba.b()[0], epsilon = 1e-15);
        assert_abs_diff_eq!(ba.b()[2], ba.b()[1], epsilon = 1e-15);
    }
}
