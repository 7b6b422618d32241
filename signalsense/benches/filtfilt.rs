use criterion::{black_box, criterion_group, criterion_main, Criterion};
use dasp_signal::{rate, Signal};
use signalsense::kernel::KernelLifecycle;
use signalsense::signal::filter::design::{ButterLowpassConfig, ButterLowpassKernel};
use signalsense::signal::filter::{FiltFiltKernel, FiltFiltPad};
use signalsense::signal::traits::{FiltFilt1D, IirDesign};

fn sine_input(sample_hz: f64, seconds: usize, repeats: usize) -> Vec<f64> {
    let mut signal = rate(sample_hz).const_hz(25.).sine();
    let sin_wave: Vec<f64> = (0..seconds * sample_hz as usize)
        .map(|_| signal.next())
        .collect::<Vec<_>>();
    (0..repeats).flat_map(|_| sin_wave.clone()).collect::<Vec<_>>()
}

fn butter_kernel(order: usize) -> FiltFiltKernel<f64> {
    let ba = ButterLowpassKernel::try_new(ButterLowpassConfig {
        order,
        cutoff: 50.0,
        fs: 1666.0,
    })
    .expect("butter kernel config should be valid")
    .run_alloc()
    .expect("butter design should succeed");
    FiltFiltKernel::from_filter(ba, Some(FiltFiltPad::default())).expect("stable filter")
}

///
/// 4th order Butterworth low-pass filtfilt over 10 seconds of 1666Hz sine wave
///
fn butter_filtfilt_10x(c: &mut Criterion) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    let kernel = butter_kernel(4);
    let sin_wave = sine_input(1666., 10, 10);

    c.bench_function("filtfilt_10x", |b| {
        b.iter(|| {
            black_box(
                kernel
                    .run_alloc(sin_wave.as_slice())
                    .expect("benchmark input should satisfy filtfilt preconditions"),
            );
        });
    });
}

///
/// 8th order Butterworth low-pass filtfilt over 10 seconds of 1666Hz sine wave
///
fn butter_filtfilt_8th(c: &mut Criterion) {
    let kernel = butter_kernel(8);
    let sin_wave = sine_input(1666., 10, 1);

    c.bench_function("filtfilt_8th", |b| {
        b.iter(|| {
            black_box(
                kernel
                    .run_alloc(sin_wave.as_slice())
                    .expect("benchmark input should satisfy filtfilt preconditions"),
            );
        });
    });
}

fn butter_design(c: &mut Criterion) {
    c.bench_function("butter_lowpass_design_8th", |b| {
        b.iter(|| {
            black_box(
                signalsense::signal::filter::design::butter_lowpass(
                    black_box(8),
                    black_box(50.0f64),
                    black_box(1666.0),
                )
                .expect("valid design"),
            );
        });
    });
}

criterion_group!(benches, butter_filtfilt_10x, butter_filtfilt_8th, butter_design);
criterion_main!(benches);
