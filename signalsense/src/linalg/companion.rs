use crate::kernel::{Error, KernelLifecycle, Read1D, Result};
use nalgebra::{DMatrix, RealField};

/// 1D companion-matrix construction capability.
pub trait CompanionBuild1D<T> {
    /// Output matrix type.
    type Output;

    /// Build companion matrix from polynomial coefficients.
    fn run<I>(&self, input: &I) -> Result<Self::Output>
    where
        I: Read1D<T> + ?Sized;
}

/// Constructor config for [`CompanionKernel`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanionConfig {
    /// Optional expected coefficient length.
    pub expected_len: Option<usize>,
}

/// Trait-first companion-matrix kernel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompanionKernel {
    expected_len: Option<usize>,
}

impl KernelLifecycle for CompanionKernel {
    type Config = CompanionConfig;

    fn try_new(config: Self::Config) -> Result<Self> {
        if let Some(expected_len) = config.expected_len {
            if expected_len < 2 {
                return Err(Error::InvalidArg {
                    arg: "expected_len",
                    reason: "companion requires at least 2 coefficients",
                });
            }
        }
        Ok(Self {
            expected_len: config.expected_len,
        })
    }
}

impl<T> CompanionBuild1D<T> for CompanionKernel
where
    T: RealField + Copy,
{
    type Output = DMatrix<T>;

    fn run<I>(&self, input: &I) -> Result<Self::Output>
    where
        I: Read1D<T> + ?Sized,
    {
        let coeffs = input.read_slice()?;
        if coeffs.len() < 2 {
            return Err(Error::InvalidArg {
                arg: "coeffs",
                reason: "companion requires at least 2 coefficients",
            });
        }
        if let Some(expected_len) = self.expected_len {
            if coeffs.len() != expected_len {
                return Err(Error::LengthMismatch {
                    arg: "coeffs",
                    expected: expected_len,
                    got: coeffs.len(),
                });
            }
        }
        if coeffs[0] == T::zero() {
            return Err(Error::InvalidArg {
                arg: "coeffs",
                reason: "leading coefficient must be non-zero",
            });
        }
        Ok(companion_from_slice(coeffs))
    }
}

/// First row `-a[1..] / a[0]`, ones on the sub-diagonal.
fn companion_from_slice<T>(coeffs: &[T]) -> DMatrix<T>
where
    T: RealField + Copy,
{
    let m = coeffs.len() - 1;
    let a0 = coeffs[0];
    DMatrix::from_fn(m, m, |r, c| {
        if r == 0 {
            -coeffs[c + 1] / a0
        } else if r == c + 1 {
            T::one()
        } else {
            T::zero()
        }
    })
}

/// Create the companion matrix of the polynomial with coefficients `coeffs`,
/// highest power first.
///
/// The eigenvalues of the result are the roots of the polynomial.
///
/// # Errors
/// [`Error::InvalidArg`] for fewer than two coefficients or a zero leading
/// coefficient.
pub fn companion<T>(coeffs: &[T]) -> Result<DMatrix<T>>
where
    T: RealField + Copy,
{
    CompanionKernel::default().run(coeffs)
}
