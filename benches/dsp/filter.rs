//! Benchmarks for the lowpass state-variable filter.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use strumkit::dsp::{filter::SVFilter, sweep::CutoffSweep};
use strumkit::graph::node::RenderCtx;

use crate::BLOCK_SIZES;

pub fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/filter");
    let ctx = RenderCtx::from_freq(48_000.0, 440.0, 1.0);

    for &size in BLOCK_SIZES {
        // Generate a test signal (sawtooth-like ramp)
        let input: Vec<f32> = (0..size)
            .map(|i| (i as f32 / size as f32) * 2.0 - 1.0)
            .collect();

        // Fixed cutoff: coefficients computed once per block
        let mut filter = SVFilter::lowpass(1000.0).with_q(0.5);
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                filter.render(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Swept cutoff: one tan() per sample
        let mut filter = SVFilter::lowpass(800.0).with_q(0.5);
        let mut sweep = CutoffSweep::new(800.0, 3000.0, 1000.0, 0.02, 0.3);
        let mut cutoffs = vec![0.0f32; size];
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("lowpass_swept", size), &size, |b, _| {
            b.iter(|| {
                sweep.trigger(ctx.sample_rate);
                sweep.render(&mut cutoffs);
                buffer.copy_from_slice(&input);
                filter.render_swept(black_box(&mut buffer), &cutoffs, black_box(&ctx));
            })
        });
    }

    group.finish();
}
