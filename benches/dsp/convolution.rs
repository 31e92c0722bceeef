//! Benchmarks for FFT convolution and binaural placement.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use rustfft::FftPlanner;
use spatial_synth::{
    dsp::convolver::{Convolver, MAX_RESPONSE_LEN},
    spatial::{spatializer::Spatializer, table::SYNTHETIC_RESPONSE_LEN},
    Azimuth, ImpulseResponseTable,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

fn decaying_response(len: usize) -> Vec<f32> {
    (0..len).map(|i| 0.9f32.powi(i as i32)).collect()
}

pub fn bench_convolution(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/convolution");
    let mut planner = FftPlanner::new();
    let table = ImpulseResponseTable::synthetic(SAMPLE_RATE);

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.05).sin()).collect();
        let mut output = vec![0.0f32; size];

        for len in [SYNTHETIC_RESPONSE_LEN, MAX_RESPONSE_LEN] {
            let mut convolver = Convolver::new(len, &mut planner);
            convolver.load_immediate(&decaying_response(len));
            group.bench_with_input(
                BenchmarkId::new(format!("steady_{len}"), size),
                &size,
                |b, _| b.iter(|| convolver.process(black_box(&input), black_box(&mut output))),
            );
        }

        // Worst case: every block starts a new cross-fade
        let responses = [decaying_response(SYNTHETIC_RESPONSE_LEN), vec![1.0; 1]];
        let mut convolver = Convolver::new(SYNTHETIC_RESPONSE_LEN, &mut planner);
        let mut flip = 0;
        group.bench_with_input(BenchmarkId::new("crossfading", size), &size, |b, _| {
            b.iter(|| {
                flip ^= 1;
                convolver.load(&responses[flip]);
                convolver.process(black_box(&input), black_box(&mut output));
            })
        });

        let mut spatializer = Spatializer::new(table.response_len(), &mut planner);
        spatializer.load_response(&table, Azimuth::new(60), false);
        let mut right = vec![0.0f32; size];
        group.bench_with_input(BenchmarkId::new("spatializer", size), &size, |b, _| {
            b.iter(|| {
                spatializer.process(
                    black_box(&input),
                    black_box(&mut output),
                    black_box(&mut right),
                )
            })
        });
    }

    group.finish();
}
