use rustfft::FftPlanner;

use crate::{
    dsp::{Adsr, DecayEnvelope, FilterType, Oscillator, StereoFilter},
    spatial::{Azimuth, ImpulseResponseTable, Spatializer},
    synth::params::{EnvelopeMode, SynthParameters, FILTERS, OSCILLATORS},
    MAX_BLOCK_SIZE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoiceState {
    Free,      // Available for allocation
    Active,    // Playing, gate high
    Releasing, // Key released, envelope in release phase
    Finished,  // Envelope ended inside the last block, waiting to be retired
}

/// Working buffers shared by every voice of a synth. One voice renders at a time.
pub struct VoiceScratch {
    oscillator: Vec<f32>,
    dry_left: Vec<f32>,
    dry_right: Vec<f32>,
    wet_left: Vec<f32>,
    wet_right: Vec<f32>,
}

impl VoiceScratch {
    pub fn new() -> Self {
        Self {
            oscillator: vec![0.0; MAX_BLOCK_SIZE],
            dry_left: vec![0.0; MAX_BLOCK_SIZE],
            dry_right: vec![0.0; MAX_BLOCK_SIZE],
            wet_left: vec![0.0; MAX_BLOCK_SIZE],
            wet_right: vec![0.0; MAX_BLOCK_SIZE],
        }
    }
}

impl Default for VoiceScratch {
    fn default() -> Self {
        Self::new()
    }
}

/// One sounding key: three spatialized oscillators, two filters in series
/// and an amplitude envelope.
pub struct Voice {
    key: u8,
    frequency: f32,
    state: VoiceState,
    percussive: bool,

    oscillators: [Oscillator; OSCILLATORS],
    spatializers: [Spatializer; OSCILLATORS],
    filters: [StereoFilter; FILTERS],
    filter_envelope: Adsr,
    amp_adsr: Adsr,
    amp_decay: DecayEnvelope,
}

impl Voice {
    /// `slot` and `seed` pick this voice's noise sequences.
    pub fn new(
        slot: usize,
        seed: u64,
        sample_rate: f32,
        response_len: usize,
        planner: &mut FftPlanner<f32>,
    ) -> Self {
        Self {
            key: 0,
            frequency: 0.0,
            state: VoiceState::Free,
            percussive: false,
            oscillators: std::array::from_fn(|i| {
                Oscillator::new(sample_rate, noise_seed(seed, slot, i))
            }),
            spatializers: std::array::from_fn(|_| Spatializer::new(response_len, planner)),
            filters: std::array::from_fn(|_| StereoFilter::new(FilterType::LowPass, sample_rate)),
            filter_envelope: Adsr::new(sample_rate),
            amp_adsr: Adsr::new(sample_rate),
            amp_decay: DecayEnvelope::new(sample_rate),
        }
    }

    pub fn start(
        &mut self,
        key: u8,
        frequency: f32,
        params: &SynthParameters,
        table: &ImpulseResponseTable,
    ) {
        self.key = key;
        self.frequency = frequency;
        self.state = VoiceState::Active;
        self.percussive = params.is_percussive();

        for spatializer in &mut self.spatializers {
            spatializer.reset();
        }
        for filter in &mut self.filters {
            filter.reset();
        }
        self.apply_parameters(params, table, false);

        for oscillator in &mut self.oscillators {
            oscillator.start(frequency);
        }

        self.filter_envelope.reset();
        self.amp_adsr.reset();
        self.amp_decay.reset();

        self.filter_envelope.note_on();
        if self.percussive {
            self.amp_decay.note_on();
        } else {
            self.amp_adsr.note_on();
        }
    }

    /// Push a snapshot into every stage. The envelope mode only takes effect
    /// on the next `start`.
    pub fn apply_parameters(
        &mut self,
        params: &SynthParameters,
        table: &ImpulseResponseTable,
        crossfade: bool,
    ) {
        let stages = self.oscillators.iter_mut().zip(self.spatializers.iter_mut());
        for ((oscillator, spatializer), osc) in stages.zip(&params.oscillators) {
            oscillator.set_waveform(osc.waveform);
            oscillator.set_gain_db(osc.gain_db);
            oscillator.set_detune(osc.detune);

            spatializer.load_response(table, Azimuth::from(osc.azimuth), crossfade);
            spatializer.set_distance(osc.distance);
            if oscillator.is_muted() {
                spatializer.reset();
            }
        }

        for (filter, p) in self.filters.iter_mut().zip(&params.filters) {
            filter.configure(p.filter_type, p.cutoff_hz, p.resonance);
        }

        let fe = params.filter_envelope;
        self.filter_envelope
            .set_parameters(fe.attack, fe.decay, fe.sustain, fe.release);
        let ae = params.amp_envelope;
        self.amp_adsr
            .set_parameters(ae.attack, ae.decay, ae.sustain, ae.release);
        if let EnvelopeMode::Percussive {
            attack,
            decay,
            release,
        } = params.envelope_mode
        {
            self.amp_decay.set_parameters(attack, decay, 0.0, release);
        }
    }

    pub fn release(&mut self) {
        if self.state == VoiceState::Active {
            self.state = VoiceState::Releasing;
            self.filter_envelope.note_off();
            if self.percussive {
                self.amp_decay.note_off();
            } else {
                self.amp_adsr.note_off();
            }
        }
    }

    /// Add this voice's stereo output into `left`/`right`. Stops at the sample
    /// where the amplitude envelope ends and marks the voice finished.
    pub fn render(&mut self, left: &mut [f32], right: &mut [f32], scratch: &mut VoiceScratch) {
        if !self.is_sounding() {
            return;
        }

        let n = left.len().min(right.len()).min(MAX_BLOCK_SIZE);
        let osc_buf = &mut scratch.oscillator[..n];
        let dry_left = &mut scratch.dry_left[..n];
        let dry_right = &mut scratch.dry_right[..n];
        let wet_left = &mut scratch.wet_left[..n];
        let wet_right = &mut scratch.wet_right[..n];

        dry_left.fill(0.0);
        dry_right.fill(0.0);
        for (oscillator, spatializer) in self.oscillators.iter_mut().zip(&mut self.spatializers) {
            if oscillator.is_muted() {
                continue;
            }
            oscillator.render(osc_buf);
            spatializer.process(osc_buf, wet_left, wet_right);
            for i in 0..n {
                dry_left[i] += wet_left[i];
                dry_right[i] += wet_right[i];
            }
        }

        wet_left.copy_from_slice(dry_left);
        wet_right.copy_from_slice(dry_right);
        for filter in &mut self.filters {
            filter.process_block(wet_left, wet_right);
        }

        for i in 0..n {
            let blend = self.filter_envelope.next_sample();
            let l = dry_left[i] + (wet_left[i] - dry_left[i]) * blend;
            let r = dry_right[i] + (wet_right[i] - dry_right[i]) * blend;

            let gain = if self.percussive {
                self.amp_decay.next_sample()
            } else {
                self.amp_adsr.next_sample()
            };
            left[i] += l * gain;
            right[i] += r * gain;

            if self.envelope_finished() {
                self.state = VoiceState::Finished;
                break;
            }
        }
    }

    fn envelope_finished(&self) -> bool {
        if self.percussive {
            self.amp_decay.is_finished()
        } else {
            !self.amp_adsr.is_active()
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for oscillator in &mut self.oscillators {
            oscillator.set_sample_rate(sample_rate);
        }
        for filter in &mut self.filters {
            filter.set_sample_rate(sample_rate);
        }
        self.filter_envelope.set_sample_rate(sample_rate);
        self.amp_adsr.set_sample_rate(sample_rate);
        self.amp_decay.set_sample_rate(sample_rate);
    }

    pub fn free(&mut self) {
        self.state = VoiceState::Free;
        self.key = 0;
        self.frequency = 0.0;
    }

    pub fn is_free(&self) -> bool {
        self.state == VoiceState::Free
    }

    /// Active or releasing.
    pub fn is_sounding(&self) -> bool {
        matches!(self.state, VoiceState::Active | VoiceState::Releasing)
    }

    pub fn is_finished(&self) -> bool {
        self.state == VoiceState::Finished
    }

    pub fn key(&self) -> u8 {
        self.key
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn state(&self) -> VoiceState {
        self.state
    }
}

fn noise_seed(seed: u64, slot: usize, oscillator: usize) -> u64 {
    let stream = (slot * OSCILLATORS + oscillator) as u64 + 1;
    seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}
