use crate::MIN_TIME;

/*
Exponential Attack/Decay Envelope
=================================

The percussive envelope of the minimal engine. Two amplitudes start at 1.0 on
note_on and shrink geometrically every sample:

    attack_amp *= attack_factor     (fast, ~10 ms)
    decay_amp  *= decay_factor      (slow, ~1 s)

    gain = (1 - attack_amp) * decay_amp

(1 - attack_amp) rises quickly from 0 toward 1, decay_amp falls slowly toward
0, so the product is a short rise followed by a long exponential tail.

A time constant τ (seconds) maps to a per-sample factor:

    factor = exp(-1 / (τ * sample_rate))

    τ = 10 ms at 48 kHz  → 0.99792
    τ = 1 s   at 48 kHz  → 0.99998

The envelope is finished once decay_amp drops below DROP_LEVEL (-60 dBFS).
note_off swaps the decay factor for the release factor; sustain has no meaning
here and is ignored.
*/

/// Linear level of the silence floor (-60 dBFS).
pub const DROP_LEVEL: f32 = 0.001;

pub struct DecayEnvelope {
    attack_time: f32,
    decay_time: f32,
    release_time: f32,
    sample_rate: f32,

    attack_factor: f32,
    decay_factor: f32,
    attack_amp: f32,
    decay_amp: f32,
    gate: bool,
}

impl DecayEnvelope {
    pub fn new(sample_rate: f32) -> Self {
        let mut env = Self {
            attack_time: 0.01,
            decay_time: 1.0,
            release_time: 1.0,
            sample_rate,
            attack_factor: 0.0,
            decay_factor: 0.0,
            attack_amp: 1.0,
            decay_amp: 0.0,
            gate: false,
        };
        env.update_factors();
        env
    }

    /// Attack, decay and release are time constants in seconds. Sustain is ignored.
    pub fn set_parameters(&mut self, attack: f32, decay: f32, _sustain: f32, release: f32) {
        self.attack_time = sanitize_time(attack);
        self.decay_time = sanitize_time(decay);
        self.release_time = sanitize_time(release);
        self.update_factors();
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.update_factors();
    }

    fn update_factors(&mut self) {
        self.attack_factor = time_to_factor(self.attack_time, self.sample_rate);
        let releasing = !self.gate && self.decay_amp > 0.0;
        let tail = if releasing {
            self.release_time
        } else {
            self.decay_time
        };
        self.decay_factor = time_to_factor(tail, self.sample_rate);
    }

    pub fn note_on(&mut self) {
        self.gate = true;
        self.attack_amp = 1.0;
        self.decay_amp = 1.0;
        self.decay_factor = time_to_factor(self.decay_time, self.sample_rate);
    }

    pub fn note_off(&mut self) {
        if !self.gate {
            return;
        }
        self.gate = false;
        self.decay_factor = time_to_factor(self.release_time, self.sample_rate);
    }

    /// Current gain, then advance both amplitudes by one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        if self.is_finished() {
            return 0.0;
        }

        let gain = (1.0 - self.attack_amp) * self.decay_amp;
        self.attack_amp *= self.attack_factor;
        self.decay_amp *= self.decay_factor;
        gain
    }

    /// True once the decay amplitude has fallen below [`DROP_LEVEL`].
    pub fn is_finished(&self) -> bool {
        self.decay_amp < DROP_LEVEL
    }

    pub fn reset(&mut self) {
        self.gate = false;
        self.attack_amp = 1.0;
        self.decay_amp = 0.0;
    }
}

fn sanitize_time(seconds: f32) -> f32 {
    if seconds.is_finite() {
        seconds.max(MIN_TIME)
    } else {
        MIN_TIME
    }
}

#[inline]
fn time_to_factor(seconds: f32, sample_rate: f32) -> f32 {
    (-1.0 / (seconds * sample_rate)).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f32 = 48_000.0;

    #[test]
    fn default_factors_match_classic_constants() {
        let env = DecayEnvelope::new(SAMPLE_RATE);
        assert!((env.attack_factor - 0.99792).abs() < 1e-4);
        assert!((env.decay_factor - 0.99998).abs() < 1e-5);
    }

    #[test]
    fn gain_rises_then_strictly_decreases() {
        let mut env = DecayEnvelope::new(SAMPLE_RATE);
        env.note_on();

        let gains: Vec<f32> = (0..48_000).map(|_| env.next_sample()).collect();
        assert_eq!(gains[0], 0.0, "starts silent");

        let peak = gains
            .iter()
            .enumerate()
            .fold((0, 0.0f32), |acc, (i, &g)| if g > acc.1 { (i, g) } else { acc })
            .0;
        assert!(peak > 100 && peak < 10_000, "peak at {peak}");

        // Well past the attack (10 time constants) every sample is smaller
        for pair in gains[4_800..].windows(2) {
            assert!(pair[1] < pair[0]);
        }
    }

    #[test]
    fn finishes_below_drop_level() {
        let mut env = DecayEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.001, 0.01, 0.0, 0.01);
        env.note_on();

        // ln(1000) ≈ 6.9 time constants of 10 ms
        let mut samples = 0;
        while !env.is_finished() {
            env.next_sample();
            samples += 1;
            assert!(samples < 48_000, "envelope never finished");
        }
        assert!((3_000..4_000).contains(&samples), "finished after {samples}");
        assert_eq!(env.next_sample(), 0.0);
    }

    #[test]
    fn note_off_switches_to_release_rate() {
        let mut env = DecayEnvelope::new(SAMPLE_RATE);
        env.set_parameters(0.001, 2.0, 0.0, 0.005);
        env.note_on();
        for _ in 0..480 {
            env.next_sample();
        }
        assert!(!env.is_finished());

        env.note_off();
        for _ in 0..2_400 {
            env.next_sample();
        }
        assert!(env.is_finished(), "fast release should reach the floor");
    }
}
