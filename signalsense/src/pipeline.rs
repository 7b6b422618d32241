//! Generate, contaminate, filter and analyse in one call.
//!
//! [`run`] chains every stage: a clean sine, additive Gaussian noise, a
//! Butterworth low-pass design, zero-phase filtering, and the amplitude
//! spectrum of each of the three signals. The first failing stage aborts the
//! run with its error.

use crate::kernel::Result;
use crate::signal::filter::design::{butter_lowpass, BaFormatFilter};
use crate::signal::filter::filtfilt_signal;
use crate::signal::noise::add_noise;
use crate::signal::spectral::Spectrum;
use crate::signal::wave::{sine, SineWaveConfig};
use crate::signal::SampledSignal;
use nalgebra::RealField;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Parameters of a full pipeline run.
///
/// Defaults: 5 Hz tone of amplitude 1 for 2 s at 1000 Hz, noise level 0.5,
/// 4th-order low-pass at 10 Hz, no fixed seed. With the `serde` feature the
/// config loads from JSON; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        default,
        bound(deserialize = "F: serde::Deserialize<'de> + RealField + Copy")
    )
)]
pub struct PipelineConfig<F> {
    /// Tone frequency in Hz.
    pub frequency: F,
    /// Tone amplitude.
    pub amplitude: F,
    /// Signal duration in seconds.
    pub duration: F,
    /// Sample rate in Hz.
    pub sample_rate: F,
    /// Standard deviation of the additive noise.
    pub noise_level: F,
    /// Low-pass cutoff in Hz.
    pub cutoff: F,
    /// Low-pass order.
    pub order: usize,
    /// Seed for the noise generator; `None` draws from the thread-local RNG.
    pub seed: Option<u64>,
}

impl<F> Default for PipelineConfig<F>
where
    F: RealField + Copy,
{
    fn default() -> Self {
        Self {
            frequency: nalgebra::convert::<f64, F>(5.0),
            amplitude: F::one(),
            duration: nalgebra::convert::<f64, F>(2.0),
            sample_rate: nalgebra::convert::<f64, F>(1000.0),
            noise_level: nalgebra::convert::<f64, F>(0.5),
            cutoff: nalgebra::convert::<f64, F>(10.0),
            order: 4,
            seed: None,
        }
    }
}

/// Everything a pipeline run produces.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineOutput<F> {
    /// Sample times `k / fs` in seconds.
    pub times: Vec<F>,
    /// Generated tone.
    pub clean: SampledSignal<F>,
    /// Tone plus noise.
    pub noisy: SampledSignal<F>,
    /// Zero-phase filtered noisy signal.
    pub filtered: SampledSignal<F>,
    /// Designed low-pass coefficients.
    pub coefficients: BaFormatFilter<F>,
    /// Spectrum of `clean`.
    pub clean_spectrum: Spectrum<F>,
    /// Spectrum of `noisy`.
    pub noisy_spectrum: Spectrum<F>,
    /// Spectrum of `filtered`.
    pub filtered_spectrum: Spectrum<F>,
}

/// Run every stage with noise drawn from `rng`.
///
/// # Errors
/// The error of the first stage that rejects its input, for example
/// [`Error::CutoffAboveNyquist`](crate::kernel::Error::CutoffAboveNyquist).
pub fn run<F, R>(config: &PipelineConfig<F>, rng: &mut R) -> Result<PipelineOutput<F>>
where
    F: RealField + Copy,
    R: Rng + ?Sized,
{
    tracing::debug!(
        order = config.order,
        seed = ?config.seed,
        "running signal pipeline"
    );
    let clean = sine(SineWaveConfig {
        frequency: config.frequency,
        amplitude: config.amplitude,
        duration: config.duration,
        fs: config.sample_rate,
    })?;
    let noisy = add_noise(&clean, config.noise_level, rng)?;
    let coefficients = butter_lowpass(config.order, config.cutoff, config.sample_rate)?;
    let filtered = filtfilt_signal(&coefficients, &noisy)?;

    Ok(PipelineOutput {
        times: clean.times(),
        clean_spectrum: clean.spectrum()?,
        noisy_spectrum: noisy.spectrum()?,
        filtered_spectrum: filtered.spectrum()?,
        clean,
        noisy,
        filtered,
        coefficients,
    })
}

/// [`run`] with a [`StdRng`] seeded from `seed`; identical inputs give
/// identical outputs.
pub fn run_seeded<F>(config: &PipelineConfig<F>, seed: u64) -> Result<PipelineOutput<F>>
where
    F: RealField + Copy,
{
    run(config, &mut StdRng::seed_from_u64(seed))
}

/// [`run`] seeded from `config.seed`, or from the thread-local generator
/// when no seed is set.
pub fn execute<F>(config: &PipelineConfig<F>) -> Result<PipelineOutput<F>>
where
    F: RealField + Copy,
{
    match config.seed {
        Some(seed) => run_seeded(config, seed),
        None => run(config, &mut rand::rng()),
    }
}
