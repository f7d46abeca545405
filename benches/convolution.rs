//! Benchmark comparing the four execution strategies.

use convolver::prelude::*;
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn bench_image(width: usize, height: usize, channels: usize) -> PixelBuffer {
    let mut state = 0x2545_f491u32;
    let data: Vec<u8> = (0..width * height * channels)
        .map(|_| {
            state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
            (state >> 24) as u8
        })
        .collect();
    PixelBuffer::new(width, height, channels, data).unwrap()
}

fn bench_strategies(c: &mut Criterion) {
    let input = bench_image(512, 512, 3);
    let kernel = presets::gaussian();

    let mut group = c.benchmark_group("gaussian_512x512x3");
    for mode in ExecutionMode::ALL {
        group.bench_with_input(
            BenchmarkId::from_parameter(mode.token()),
            &mode,
            |b, &mode| {
                let strategy = mode.strategy();
                b.iter(|| strategy.compute(&input, &kernel).unwrap());
            },
        );
    }
    group.finish();
}

fn bench_kernels(c: &mut Criterion) {
    let input = bench_image(256, 256, 3);
    let registry = PresetRegistry::with_builtins();

    let mut group = c.benchmark_group("shared_256x256x3");
    for token in registry.tokens() {
        let kernel = registry.create(token).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(token), &kernel, |b, kernel| {
            let strategy = ExecutionMode::Shared.strategy();
            b.iter(|| strategy.compute(&input, kernel).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_strategies, bench_kernels);
criterion_main!(benches);
