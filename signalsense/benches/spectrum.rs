use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use signalsense::pipeline::{run, PipelineConfig};
use signalsense::signal::spectral::spectrum;

fn noise(n: usize) -> Vec<f64> {
    (0..n).map(|k| ((k * 7919) % 1013) as f64 / 1013.0 - 0.5).collect()
}

///
/// Power-of-two lengths take the radix-2 path, the others the direct DFT.
///
fn amplitude_spectrum(c: &mut Criterion) {
    let mut group = c.benchmark_group("spectrum");
    for n in [1024usize, 2000, 4096] {
        let x = noise(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &x, |b, x| {
            b.iter(|| black_box(spectrum(x.as_slice(), 1000.0).expect("non-empty input")));
        });
    }
    group.finish();
}

fn default_pipeline(c: &mut Criterion) {
    let config = PipelineConfig::<f64>::default();
    c.bench_function("pipeline_default", |b| {
        let mut rng = StdRng::seed_from_u64(0);
        b.iter(|| black_box(run(&config, &mut rng).expect("default config is valid")));
    });
}

criterion_group!(benches, amplitude_spectrum, default_pipeline);
criterion_main!(benches);
