use std::f32::consts::{FRAC_2_PI, TAU};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::db_to_gain;

/*
Phase-Accumulator Oscillator
============================

Every oscillator keeps a running phase (radians) and advances it by a fixed
increment each sample:

    phase_inc = 2π · f / sample_rate

The waveform is a pure function of phase, evaluated with closed-form
trigonometric identities rather than lookup tables:

  Sine      sin(φ)
  Sawtooth  -(2/π) · atan(1 / tan(φ/2))     rises -1 → +1 over one period
  Square    sign(sin(φ))                     -1 at φ = 0
  Triangle  (2/π) · asin(sin(φ))
  Noise     uniform in [-1, 1], no pitch

The phase is wrapped back into [0, 2π) after each step. The shapes are all
2π-periodic so wrapping does not change the output, it only keeps f32
precision from degrading over long notes.

Noise draws from a PRNG owned by the oscillator itself, seeded by the caller,
so renders are reproducible.

Detune is applied to the fundamental before the increment is derived, either
as cents (f · 2^(c/1200)) or as a fixed offset in Hz. Gain arrives in dB and
is applied after the waveform is evaluated.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Waveform {
    #[default]
    Sine,
    Sawtooth,
    Square,
    Triangle,
    Noise,
}

/// Frequency offset of one oscillator relative to the voice fundamental.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detune {
    /// Relative offset, 100 cents = 1 semitone.
    Cents(f32),
    /// Absolute offset added to the fundamental.
    Hz(f32),
}

impl Default for Detune {
    fn default() -> Self {
        Detune::Cents(0.0)
    }
}

impl Detune {
    /// Frequency produced when this offset is applied to `fundamental`.
    #[inline]
    pub fn apply(self, fundamental: f32) -> f32 {
        match self {
            Detune::Cents(cents) if cents != 0.0 => fundamental * 2.0_f32.powf(cents / 1200.0),
            Detune::Cents(_) => fundamental,
            Detune::Hz(hz) => fundamental + hz,
        }
    }
}

/// Evaluate `waveform` at `phase` (radians).
#[inline]
fn shape(waveform: Waveform, phase: f32, rng: &mut fastrand::Rng) -> f32 {
    match waveform {
        Waveform::Sine => phase.sin(),
        Waveform::Sawtooth => -FRAC_2_PI * (0.5 * phase).tan().recip().atan(),
        Waveform::Square => {
            if phase.sin() > 0.0 {
                1.0
            } else {
                -1.0
            }
        }
        Waveform::Triangle => FRAC_2_PI * phase.sin().asin(),
        Waveform::Noise => 2.0 * rng.f32() - 1.0,
    }
}

pub struct Oscillator {
    waveform: Waveform,
    gain: f32,
    detune: Detune,
    fundamental: f32,
    sample_rate: f32,
    phase: f32,
    phase_inc: f32,
    rng: fastrand::Rng,
}

impl Oscillator {
    pub fn new(sample_rate: f32, seed: u64) -> Self {
        Self {
            waveform: Waveform::Sine,
            gain: 1.0,
            detune: Detune::default(),
            fundamental: 0.0,
            sample_rate,
            phase: 0.0,
            phase_inc: 0.0,
            rng: fastrand::Rng::with_seed(seed),
        }
    }

    /// Begin a new note: phase restarts at zero and the increment tracks `fundamental`.
    pub fn start(&mut self, fundamental: f32) {
        self.fundamental = fundamental;
        self.phase = 0.0;
        self.update_increment();
    }

    pub fn set_waveform(&mut self, waveform: Waveform) {
        self.waveform = waveform;
    }

    pub fn set_gain_db(&mut self, gain_db: f32) {
        self.gain = db_to_gain(gain_db);
    }

    pub fn set_detune(&mut self, detune: Detune) {
        self.detune = detune;
        self.update_increment();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_increment();
    }

    fn update_increment(&mut self) {
        let nyquist = 0.5 * self.sample_rate;
        let frequency = self.detune.apply(self.fundamental);
        let frequency = if frequency.is_finite() {
            frequency.clamp(0.0, nyquist)
        } else {
            0.0
        };
        self.phase_inc = TAU * frequency / self.sample_rate;
    }

    /// Produce one sample and step the phase forward.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let sample = shape(self.waveform, self.phase, &mut self.rng) * self.gain;

        self.phase += self.phase_inc;
        if self.phase >= TAU {
            self.phase -= TAU;
        }

        sample
    }

    /// Fill `out` with consecutive samples.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.advance();
        }
    }

    /// True when the gain is zero and rendering can be skipped.
    pub fn is_muted(&self) -> bool {
        self.gain == 0.0
    }

    /// Effective frequency after detune, in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate / TAU
    }
}
