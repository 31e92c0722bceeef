//! Benchmarks for complete voice chains.
//!
//! A voice is three oscillators, each convolved into stereo, then two filter
//! stages and the amplitude envelope. The poly cases run the whole renderer
//! with every slot busy, which is the callback's worst case.

use std::{hint::black_box, sync::Arc};

use criterion::{BenchmarkId, Criterion};
use rustfft::FftPlanner;
use spatial_synth::{
    build,
    dsp::{Detune, Waveform},
    synth::{voice::{Voice, VoiceScratch}, EnvelopeMode, SynthParameters, KEYS_VOICED},
    ImpulseResponseTable, SynthConfig,
};

use crate::{BLOCK_SIZES, SAMPLE_RATE};

/// Three audible oscillators spread around the head.
fn wide_patch() -> SynthParameters {
    let mut params = SynthParameters::default();
    let layout = [
        (Waveform::Sawtooth, 0.0, 330),
        (Waveform::Square, -6.0, 30),
        (Waveform::Noise, -18.0, 180),
    ];
    for (osc, (waveform, gain_db, azimuth)) in params.oscillators.iter_mut().zip(layout) {
        osc.waveform = waveform;
        osc.gain_db = gain_db;
        osc.azimuth = azimuth;
        osc.detune = Detune::Cents(5.0);
    }
    params.filters[0].cutoff_hz = 3_000.0;
    params.filters[0].resonance = 0.4;
    params
}

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    let table = Arc::new(ImpulseResponseTable::synthetic(SAMPLE_RATE));
    let mut planner = FftPlanner::new();

    for &size in BLOCK_SIZES {
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];
        let mut scratch = VoiceScratch::new();

        // === SINGLE OSCILLATOR ===
        // Default patch: one sine, the other two muted and skipped
        let mut lead = Voice::new(0, 1, SAMPLE_RATE, table.response_len(), &mut planner);
        lead.start(60, 261.63, &SynthParameters::default(), &table);
        group.bench_with_input(BenchmarkId::new("single_osc", size), &size, |b, _| {
            b.iter(|| lead.render(black_box(&mut left), black_box(&mut right), &mut scratch))
        });

        // === THREE OSCILLATORS ===
        let mut wide = Voice::new(0, 1, SAMPLE_RATE, table.response_len(), &mut planner);
        wide.start(48, 130.81, &wide_patch(), &table);
        group.bench_with_input(BenchmarkId::new("three_osc", size), &size, |b, _| {
            b.iter(|| wide.render(black_box(&mut left), black_box(&mut right), &mut scratch))
        });

        // === THREE OSCILLATORS, MOVING ===
        // Re-applying a new azimuth every block keeps the convolvers cross-fading
        let mut moving = Voice::new(0, 1, SAMPLE_RATE, table.response_len(), &mut planner);
        let mut params = wide_patch();
        moving.start(48, 130.81, &params, &table);
        group.bench_with_input(BenchmarkId::new("three_osc_moving", size), &size, |b, _| {
            b.iter(|| {
                for osc in &mut params.oscillators {
                    osc.azimuth = (osc.azimuth + 1) % 360;
                }
                moving.apply_parameters(&params, &table, true);
                moving.render(black_box(&mut left), black_box(&mut right), &mut scratch);
            })
        });

        // === FULL POLYPHONY ===
        // Interleaved stereo through the public render entry point
        let patches = [
            ("poly_default", SynthParameters::default()),
            ("poly_wide", wide_patch()),
        ];
        for (name, patch) in patches {
            let (mut handle, mut synth) = build(&SynthConfig::default(), Arc::clone(&table));
            let mut output = vec![0.0f32; size * 2];
            handle.update_parameters(patch).ok();
            synth.render(&mut output, 2, SAMPLE_RATE);
            for &key in &b"asdf"[..KEYS_VOICED] {
                handle.press_key(key).ok();
                synth.render(&mut output, 2, SAMPLE_RATE);
            }

            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    output.fill(0.0);
                    synth.render(black_box(&mut output), 2, SAMPLE_RATE);
                })
            });
        }

        // === PERCUSSIVE POLYPHONY WITH RING MOD ===
        let (mut handle, mut synth) = build(&SynthConfig::default(), Arc::clone(&table));
        let mut output = vec![0.0f32; size * 2];
        let mut patch = wide_patch();
        patch.envelope_mode = EnvelopeMode::Percussive {
            attack: 0.001,
            decay: 5.0,
            release: 5.0,
        };
        patch.ring_mod_hz = 30.0;
        handle.update_parameters(patch).ok();
        synth.render(&mut output, 2, SAMPLE_RATE);
        for &key in &b"zxcv"[..KEYS_VOICED] {
            handle.press_key(key).ok();
            synth.render(&mut output, 2, SAMPLE_RATE);
        }
        group.bench_with_input(BenchmarkId::new("poly_percussive_ring", size), &size, |b, _| {
            b.iter(|| {
                output.fill(0.0);
                synth.render(black_box(&mut output), 2, SAMPLE_RATE);
            })
        });
    }

    group.finish();
}
