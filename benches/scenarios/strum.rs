//! Benchmarks for whole strummed chords.
//!
//! Measures scheduling plus mixing: every iteration strums a chord into a
//! fresh offline renderer and renders the first half second, which covers
//! every string's onset and the filter sweep.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use strumkit::{EngineConfig, Strumkit};

pub fn bench_strum(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/strum");
    group.sample_size(20);

    for symbol in ["C", "Cmaj7", "Dm9", "G13"] {
        group.bench_with_input(BenchmarkId::new("chord", symbol), &symbol, |b, &symbol| {
            b.iter(|| {
                let kit = Strumkit::offline(EngineConfig::default());
                kit.play_chord_by_name(black_box(symbol), 1.0);
                kit.with_engine(|engine| black_box(engine.sink_mut().render(0.5)))
            })
        });
    }

    // Eight overlapping strums, as when a chart cell is clicked repeatedly
    group.bench_function("retrigger_x8", |b| {
        b.iter(|| {
            let kit = Strumkit::offline(EngineConfig::default());
            for _ in 0..8 {
                kit.play_chord_by_name("Am7", 1.0);
                kit.with_engine(|engine| engine.sink_mut().render(0.05));
            }
            kit.with_engine(|engine| black_box(engine.sink_mut().render(0.5)))
        })
    });

    group.finish();
}
