use nalgebra::{Complex, RealField};

/// Multiply two polynomials given highest power first.
///
/// This is the full linear convolution of the coefficient sequences, as
/// `numpy.polymul`. Either operand being empty yields an empty product.
///
/// # Examples
/// ```
/// use signalsense_core::num_rs::polymul;
///
/// // (x + 1)(x - 2) = x^2 - x - 2
/// assert_eq!(polymul(&[1., 1.], &[1., -2.]), vec![1., -1., -2.]);
/// ```
pub fn polymul<F>(a: &[F], b: &[F]) -> Vec<F>
where
    F: RealField + Copy,
{
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![F::zero(); a.len() + b.len() - 1];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            out[i + j] += *ai * *bj;
        }
    }
    out
}

/// Monic polynomial with the given roots, where complex roots come in
/// explicit conjugate pairs.
///
/// Each entry of `pairs` stands for both `p` and `conj(p)` and contributes the
/// real quadratic `x^2 - 2 Re(p) x + |p|^2`; each entry of `reals` contributes
/// `x - r`. Expanding the pairs in real arithmetic keeps the coefficients real
/// by construction instead of relying on imaginary parts cancelling.
///
/// The result has `2 * pairs.len() + reals.len() + 1` coefficients, highest
/// power first, with a leading `1`.
///
/// # Examples
/// ```
/// use nalgebra::Complex;
/// use signalsense_core::num_rs::poly_from_conjugate_roots;
///
/// // (x - i)(x + i)(x - 2) = x^3 - 2x^2 + x - 2
/// let p = poly_from_conjugate_roots(&[Complex::new(0.0f64, 1.0)], &[2.0]);
/// assert_eq!(p, vec![1., -2., 1., -2.]);
/// ```
pub fn poly_from_conjugate_roots<F>(pairs: &[Complex<F>], reals: &[F]) -> Vec<F>
where
    F: RealField + Copy,
{
    let two = F::one() + F::one();
    let quadratics = pairs
        .iter()
        .map(|p| [F::one(), -two * p.re, p.re * p.re + p.im * p.im]);
    let linears = reals.iter().map(|r| [F::one(), -*r]);

    let mut out = vec![F::one()];
    for quad in quadratics {
        out = polymul(&out, &quad);
    }
    for lin in linears {
        out = polymul(&out, &lin);
    }
    out
}

/// Evaluate a real polynomial (highest power first) at a complex point by
/// Horner's scheme.
pub fn polyval_complex<F>(coeffs: &[F], z: Complex<F>) -> Complex<F>
where
    F: RealField + Copy,
{
    coeffs
        .iter()
        .fold(Complex::new(F::zero(), F::zero()), |acc, c| {
            acc * z + Complex::new(*c, F::zero())
        })
}
