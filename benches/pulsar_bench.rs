//! Benchmarks for the pulsar engine and its DSP hot paths.
//!
//! Run with: cargo bench
//!
//! Reference timing at 48kHz sample rate:
//!   - 64 samples  = 1.33ms deadline
//!   - 128 samples = 2.67ms deadline
//!   - 256 samples = 5.33ms deadline
//!   - 512 samples = 10.67ms deadline
//!
//! Benchmark groups:
//!   - engine/*  Full process_block under various feature loads
//!   - tables/*  Morphing table reads, the inner-loop hot spot

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pulsar_dsp::dsp::tables::TableBank;
use pulsar_dsp::engine::ParamId;
use pulsar_dsp::{CvInputs, EngineIo, PulsarEngine};

/// Common buffer sizes used in audio applications.
pub const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512];

fn render(engine: &mut PulsarEngine, out_l: &mut [f32], out_r: &mut [f32], pitch: Option<&[f32]>) {
    let mut io = EngineIo {
        out_l,
        out_r,
        cv: CvInputs {
            pitch,
            ..Default::default()
        },
    };
    engine.process_block(&mut io);
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/process_block");

    for &size in BLOCK_SIZES {
        let mut out_l = vec![0.0f32; size];
        let mut out_r = vec![0.0f32; size];

        // Single formant, no CV: the baseline cost
        let mut engine = PulsarEngine::new(48_000.0);
        engine.note_on(69, 127);
        group.bench_with_input(BenchmarkId::new("one_formant", size), &size, |b, _| {
            b.iter(|| {
                render(
                    black_box(&mut engine),
                    black_box(&mut out_l),
                    black_box(&mut out_r),
                    None,
                );
            })
        });

        // Three formants with per-formant duty and burst masking
        let mut engine = PulsarEngine::new(48_000.0);
        engine.set_param(ParamId::FormantCount, 3);
        engine.set_param(ParamId::DutyMode, 1);
        engine.set_param(ParamId::MaskMode, 2);
        engine.note_on(48, 127);
        group.bench_with_input(BenchmarkId::new("three_formants", size), &size, |b, _| {
            b.iter(|| {
                render(
                    black_box(&mut engine),
                    black_box(&mut out_l),
                    black_box(&mut out_r),
                    None,
                );
            })
        });

        // Pitch CV forces per-sample exp2 and formant-ratio math
        let pitch = vec![0.25f32; size];
        let mut engine = PulsarEngine::new(48_000.0);
        engine.note_on(69, 127);
        group.bench_with_input(BenchmarkId::new("pitch_cv", size), &size, |b, _| {
            b.iter(|| {
                render(
                    black_box(&mut engine),
                    black_box(&mut out_l),
                    black_box(&mut out_r),
                    Some(black_box(&pitch)),
                );
            })
        });
    }

    group.finish();
}

fn bench_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("tables/morph_read");
    let tables = TableBank::new();

    for &size in BLOCK_SIZES {
        group.bench_with_input(BenchmarkId::new("pulsaret", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                let mut phase = 0.0f32;
                for _ in 0..n {
                    acc += tables.pulsaret(black_box(4.5), black_box(phase));
                    phase = (phase + 0.013) % 1.0;
                }
                acc
            })
        });

        group.bench_with_input(BenchmarkId::new("window", size), &size, |b, &n| {
            b.iter(|| {
                let mut acc = 0.0f32;
                let mut phase = 0.0f32;
                for _ in 0..n {
                    acc += tables.window(black_box(1.5), black_box(phase));
                    phase = (phase + 0.013) % 1.0;
                }
                acc
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_engine, bench_tables);
criterion_main!(benches);
