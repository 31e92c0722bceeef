//! The parameter snapshot sent from the control context to the renderer.
//!
//! A snapshot is a plain `Copy` value. The renderer keeps its own copy and
//! replaces it wholesale; nothing is shared or edited in place.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dsp::{Detune, FilterType, Waveform, SILENCE_DB};
use crate::spatial::AZIMUTH_COUNT;

pub use crate::dsp::{filter::MIN_CUTOFF_HZ, ring::MAX_RING_HZ};

pub const OSCILLATORS: usize = 3;
pub const FILTERS: usize = 2;

pub const MAX_GAIN_DB: f32 = 10.0;
pub const MAX_DETUNE_CENTS: f32 = 1200.0;
pub const MAX_DETUNE_HZ: f32 = 2000.0;
pub const MAX_CUTOFF_HZ: f32 = 20_000.0;
pub const MAX_ENVELOPE_SECONDS: f32 = 5.0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OscillatorParams {
    pub waveform: Waveform,
    /// -100 dB mutes the oscillator.
    pub gain_db: f32,
    pub detune: Detune,
    /// Degrees clockwise from straight ahead.
    pub azimuth: u16,
    /// 0 = at the listener, 1 = far edge.
    pub distance: f32,
}

impl Default for OscillatorParams {
    fn default() -> Self {
        Self {
            waveform: Waveform::Sine,
            gain_db: 0.0,
            detune: Detune::default(),
            azimuth: 0,
            distance: 0.0,
        }
    }
}

impl OscillatorParams {
    pub fn muted() -> Self {
        Self {
            gain_db: SILENCE_DB,
            ..Self::default()
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    pub filter_type: FilterType,
    pub cutoff_hz: f32,
    pub resonance: f32,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            filter_type: FilterType::LowPass,
            cutoff_hz: MAX_CUTOFF_HZ,
            resonance: 0.0,
        }
    }
}

/// Stage times in seconds, sustain as a level.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdsrParams {
    pub attack: f32,
    pub decay: f32,
    pub sustain: f32,
    pub release: f32,
}

impl Default for AdsrParams {
    fn default() -> Self {
        Self {
            attack: 0.005,
            decay: 0.1,
            sustain: 0.8,
            release: 0.2,
        }
    }
}

/// Which amplitude envelope new voices use.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum EnvelopeMode {
    /// Linear ADSR driven by `amp_envelope`.
    #[default]
    Adsr,
    /// Exponential attack/decay; times are time constants in seconds.
    Percussive { attack: f32, decay: f32, release: f32 },
}

impl EnvelopeMode {
    pub fn percussive() -> Self {
        EnvelopeMode::Percussive {
            attack: 0.01,
            decay: 1.0,
            release: 0.1,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SynthParameters {
    pub oscillators: [OscillatorParams; OSCILLATORS],
    pub filters: [FilterParams; FILTERS],
    /// Blend from dry (0) to filtered (1) over the life of a note.
    pub filter_envelope: AdsrParams,
    pub amp_envelope: AdsrParams,
    pub envelope_mode: EnvelopeMode,
    pub total_gain_db: f32,
    /// 0 disables the ring modulator.
    pub ring_mod_hz: f32,
}

impl Default for SynthParameters {
    fn default() -> Self {
        Self {
            oscillators: [
                OscillatorParams::default(),
                OscillatorParams::muted(),
                OscillatorParams::muted(),
            ],
            filters: [FilterParams::default(); FILTERS],
            filter_envelope: AdsrParams {
                attack: 0.0,
                decay: 0.0,
                sustain: 1.0,
                release: 0.2,
            },
            amp_envelope: AdsrParams::default(),
            envelope_mode: EnvelopeMode::Adsr,
            total_gain_db: -6.0,
            ring_mod_hz: 0.0,
        }
    }
}

impl SynthParameters {
    /// Every field clamped into its documented range; non-finite values
    /// fall back to the default for that field.
    pub fn sanitized(&self) -> Self {
        let defaults = Self::default();
        let mut out = *self;

        for (osc, fallback) in out.oscillators.iter_mut().zip(defaults.oscillators) {
            osc.gain_db = clamp_or(osc.gain_db, SILENCE_DB, MAX_GAIN_DB, fallback.gain_db);
            osc.detune = match osc.detune {
                Detune::Cents(c) => {
                    Detune::Cents(clamp_or(c, -MAX_DETUNE_CENTS, MAX_DETUNE_CENTS, 0.0))
                }
                Detune::Hz(hz) => Detune::Hz(clamp_or(hz, -MAX_DETUNE_HZ, MAX_DETUNE_HZ, 0.0)),
            };
            osc.azimuth = osc.azimuth.min(AZIMUTH_COUNT as u16 - 1);
            osc.distance = clamp_or(osc.distance, 0.0, 1.0, 0.0);
        }

        for filter in out.filters.iter_mut() {
            filter.cutoff_hz =
                clamp_or(filter.cutoff_hz, MIN_CUTOFF_HZ, MAX_CUTOFF_HZ, MAX_CUTOFF_HZ);
            filter.resonance = clamp_or(filter.resonance, 0.0, 1.0, 0.0);
        }

        out.filter_envelope = sanitize_adsr(out.filter_envelope, defaults.filter_envelope);
        out.amp_envelope = sanitize_adsr(out.amp_envelope, defaults.amp_envelope);

        if let EnvelopeMode::Percussive {
            attack,
            decay,
            release,
        } = out.envelope_mode
        {
            let time = |t: f32, fallback: f32| clamp_or(t, 0.0, MAX_ENVELOPE_SECONDS, fallback);
            out.envelope_mode = EnvelopeMode::Percussive {
                attack: time(attack, 0.01),
                decay: time(decay, 1.0),
                release: time(release, 0.1),
            };
        }

        out.total_gain_db =
            clamp_or(out.total_gain_db, SILENCE_DB, MAX_GAIN_DB, defaults.total_gain_db);
        out.ring_mod_hz = if out.ring_mod_hz.is_finite() && out.ring_mod_hz > 0.0 {
            out.ring_mod_hz.clamp(1.0, MAX_RING_HZ)
        } else {
            0.0
        };

        out
    }

    pub fn is_percussive(&self) -> bool {
        matches!(self.envelope_mode, EnvelopeMode::Percussive { .. })
    }

    /// Parse a TOML patch. Missing fields take their defaults and the result
    /// is sanitized.
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> Result<Self, crate::error::ConfigError> {
        let parsed: SynthParameters = toml::from_str(text)?;
        Ok(parsed.sanitized())
    }
}

fn sanitize_adsr(env: AdsrParams, fallback: AdsrParams) -> AdsrParams {
    AdsrParams {
        attack: clamp_or(env.attack, 0.0, MAX_ENVELOPE_SECONDS, fallback.attack),
        decay: clamp_or(env.decay, 0.0, MAX_ENVELOPE_SECONDS, fallback.decay),
        sustain: clamp_or(env.sustain, 0.0, 1.0, fallback.sustain),
        release: clamp_or(env.release, 0.0, MAX_ENVELOPE_SECONDS, fallback.release),
    }
}

#[inline]
fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}
