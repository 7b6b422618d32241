use nalgebra::{Complex, RealField};

/// Discrete Fourier transform of a complex sequence.
///
/// Computes `X[k] = sum_j x[j] * exp(-2 pi i j k / N)` for `k = 0..N`, the same
/// unnormalized convention as `numpy.fft.fft`.
///
/// Power-of-two lengths use an iterative radix-2 Cooley-Tukey transform. Any
/// other length goes through Bluestein's chirp-z algorithm, which rewrites
/// the transform as a convolution evaluated with radix-2 transforms of the
/// next power of two at or above `2N - 1`. Both paths are `O(N log N)`. An
/// empty input yields an empty output.
///
/// # Examples
/// ```
/// use nalgebra::Complex;
/// use signalsense_core::num_rs::fft;
///
/// let x = [1.0, 0.0, -1.0, 0.0].map(|re| Complex::new(re, 0.0f64));
/// let spec = fft(&x);
/// assert!((spec[1].re - 2.0).abs() < 1e-12);
/// assert!(spec[0].re.abs() < 1e-12);
/// ```
pub fn fft<F>(x: &[Complex<F>]) -> Vec<Complex<F>>
where
    F: RealField + Copy,
{
    match x.len() {
        0 => Vec::new(),
        n if n.is_power_of_two() => fft_radix2(x),
        _ => fft_bluestein(x),
    }
}

/// [`fft`] of a real sequence.
///
/// Returns the full, two-sided transform of length `x.len()`.
pub fn fft_real<F>(x: &[F]) -> Vec<Complex<F>>
where
    F: RealField + Copy,
{
    let buf = x
        .iter()
        .map(|re| Complex::new(*re, F::zero()))
        .collect::<Vec<_>>();
    fft(&buf)
}

/// `exp(-2 pi i k / n)`, evaluated directly rather than by repeated
/// multiplication so the rounding error does not grow with `k`.
#[inline]
fn twiddle<F>(k: usize, n: usize) -> Complex<F>
where
    F: RealField + Copy,
{
    let theta = -F::two_pi() * nalgebra::convert::<f64, F>(k as f64)
        / nalgebra::convert::<f64, F>(n as f64);
    Complex::new(theta.cos(), theta.sin())
}

/// `X[k] = c[k] * sum_j (x[j] c[j]) conj(c[k - j])` with the chirp
/// `c[k] = exp(-i pi k^2 / n)`, the sum being a linear convolution.
fn fft_bluestein<F>(x: &[Complex<F>]) -> Vec<Complex<F>>
where
    F: RealField + Copy,
{
    let n = x.len();
    let m = (2 * n - 1).next_power_of_two();
    let zero = Complex::new(F::zero(), F::zero());

    // Track k^2 mod 2n incrementally so the phase never loses precision.
    let mut chirp = Vec::with_capacity(n);
    let mut phase = 0;
    for k in 0..n {
        chirp.push(twiddle::<F>(phase, 2 * n));
        phase = (phase + 2 * k + 1) % (2 * n);
    }

    let mut a = vec![zero; m];
    a.iter_mut()
        .zip(x.iter().zip(&chirp))
        .for_each(|(ak, (xk, ck))| *ak = *xk * *ck);

    let mut b = vec![zero; m];
    b[0] = chirp[0].conj();
    for k in 1..n {
        b[k] = chirp[k].conj();
        b[m - k] = chirp[k].conj();
    }

    // Inverse transform of the product as conj(fft(conj(.))) / m.
    let product = fft_radix2(&a)
        .into_iter()
        .zip(fft_radix2(&b))
        .map(|(p, q)| (p * q).conj())
        .collect::<Vec<_>>();
    let scale = F::one() / nalgebra::convert::<f64, F>(m as f64);
    fft_radix2(&product)
        .into_iter()
        .zip(chirp)
        .map(|(v, c)| c * v.conj() * scale)
        .collect()
}

fn bit_reverse_permute<T>(buf: &mut [T]) {
    let n = buf.len();
    if n <= 2 {
        return;
    }
    let bits = n.trailing_zeros();
    for i in 0..n {
        let j = i.reverse_bits() >> (usize::BITS - bits);
        if j > i {
            buf.swap(i, j);
        }
    }
}

fn fft_radix2<F>(x: &[Complex<F>]) -> Vec<Complex<F>>
where
    F: RealField + Copy,
{
    let n = x.len();
    let mut buf = x.to_vec();
    bit_reverse_permute(&mut buf);

    let mut len = 2;
    while len <= n {
        let half = len / 2;
        for k in 0..half {
            let w = twiddle::<F>(k, len);
            for start in (0..n).step_by(len) {
                let u = buf[start + k];
                let v = buf[start + k + half] * w;
                buf[start + k] = u + v;
                buf[start + k + half] = u - v;
            }
        }
        len <<= 1;
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rustfft::FftPlanner;

    fn reference(x: &[f64]) -> Vec<rustfft::num_complex::Complex<f64>> {
        let mut planner = FftPlanner::<f64>::new();
        let plan = planner.plan_fft_forward(x.len());
        let mut buf = x
            .iter()
            .map(|re| rustfft::num_complex::Complex::new(*re, 0.0))
            .collect::<Vec<_>>();
        plan.process(&mut buf);
        buf
    }

    fn test_signal(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                (2.0 * core::f64::consts::PI * 3.0 * t).sin()
                    + 0.25 * (2.0 * core::f64::consts::PI * 7.0 * t).cos()
                    + 0.1 * (i % 5) as f64
            })
            .collect()
    }

    #[test]
    fn radix2_matches_rustfft() {
        for n in [1usize, 2, 4, 8, 64, 1024] {
            let x = test_signal(n);
            let actual = fft_real(&x);
            let expected = reference(&x);
            assert_eq!(actual.len(), n);
            actual.iter().zip(expected.iter()).for_each(|(a, e)| {
                assert_abs_diff_eq!(a.re, e.re, epsilon = 1e-9);
                assert_abs_diff_eq!(a.im, e.im, epsilon = 1e-9);
            });
        }
    }

    #[test]
    fn bluestein_matches_rustfft_for_other_lengths() {
        for n in [3usize, 5, 12, 100, 250, 2000, 4099] {
            let x = test_signal(n);
            let actual = fft_real(&x);
            let expected = reference(&x);
            assert_eq!(actual.len(), n);
            // Rounding grows with the transform size.
            let tol = 1e-12 * n as f64;
            actual.iter().zip(expected.iter()).for_each(|(a, e)| {
                assert_abs_diff_eq!(a.re, e.re, epsilon = tol);
                assert_abs_diff_eq!(a.im, e.im, epsilon = tol);
            });
        }
    }

    #[test]
    fn long_non_power_of_two_transform_finds_its_tone() {
        // 5 s at 5000 Hz with a 7 Hz tone lands on bin 35.
        let n = 25_000;
        let x = (0..n)
            .map(|k| (2.0 * core::f64::consts::PI * 7.0 * k as f64 / 5000.0).sin())
            .collect::<Vec<_>>();
        let spec = fft_real(&x);
        assert_abs_diff_eq!(spec[35].norm() * 2.0 / n as f64, 1.0, epsilon = 1e-9);
        assert!(spec[..n / 2]
            .iter()
            .enumerate()
            .filter(|(k, _)| *k != 35)
            .all(|(_, c)| c.norm() * 2.0 / (n as f64) < 1e-9));
    }

    #[test]
    fn empty_and_single_inputs() {
        assert!(fft::<f64>(&[]).is_empty());
        let one = fft(&[Complex::new(2.5f64, -1.0)]);
        assert_eq!(one, vec![Complex::new(2.5, -1.0)]);
    }

    #[test]
    fn impulse_has_flat_spectrum() {
        let mut x = vec![0.0f32; 16];
        x[0] = 1.0;
        fft_real(&x).iter().for_each(|c| {
            assert_abs_diff_eq!(c.re, 1.0, epsilon = 1e-6);
            assert_abs_diff_eq!(c.im, 0.0, epsilon = 1e-6);
        });
    }
}
