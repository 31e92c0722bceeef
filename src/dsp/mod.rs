//! Low-level DSP primitives used by the voices and the mixer.
//!
//! These components are allocation-free and realtime-safe once constructed,
//! making them safe to embed directly inside voice structs. They stay focused
//! on the signal-processing math; orchestration lives in [`crate::synth`].

/// Uniformly partitioned FFT convolution with response cross-fading.
pub mod convolver;
/// Exponential attack/decay envelope used by percussive voices.
pub mod decay;
/// Attack/decay/sustain/release envelope generator.
pub mod envelope;
/// State-variable filter implementation with multiple responses.
pub mod filter;
/// Oscillator waveforms and noise sources.
pub mod oscillator;
/// Sine ring modulator applied to the final mix.
pub mod ring;

pub use decay::DecayEnvelope;
pub use envelope::{Adsr, EnvelopeStage};
pub use filter::{FilterType, SVFilter, StereoFilter};
pub use oscillator::{Detune, Oscillator, Waveform};

/// Gains at or below this level are treated as silence.
pub const SILENCE_DB: f32 = -100.0;

/// Convert decibels to a linear gain factor. Anything at or below
/// [`SILENCE_DB`] maps to exactly zero.
#[inline]
pub fn db_to_gain(db: f32) -> f32 {
    if db <= SILENCE_DB || !db.is_finite() {
        0.0
    } else {
        10.0_f32.powf(db / 20.0)
    }
}
