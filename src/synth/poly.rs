use std::sync::Arc;

use rtrb::Producer;

use crate::{
    config::SynthConfig,
    dsp::{db_to_gain, ring::RingModulator},
    spatial::ImpulseResponseTable,
    synth::{
        channel::CommandReceiver,
        message::{Command, VoiceStatus},
        params::SynthParameters,
        pool::VoicePool,
        voice::VoiceScratch,
    },
    MAX_BLOCK_SIZE,
};

/// The render-side engine. Owned by the audio callback; every method is
/// allocation-free and never blocks.
pub struct PolySynth {
    pool: VoicePool,
    rx: CommandReceiver,
    status_tx: Producer<VoiceStatus>,
    last_status: VoiceStatus,

    table: Arc<ImpulseResponseTable>,
    params: SynthParameters,
    sample_rate: f32,
    total_gain: f32,
    ring: RingModulator,

    scratch: VoiceScratch,
    mix_left: Vec<f32>,
    mix_right: Vec<f32>,
}

impl PolySynth {
    pub fn new(
        config: &SynthConfig,
        table: Arc<ImpulseResponseTable>,
        rx: CommandReceiver,
        status_tx: Producer<VoiceStatus>,
    ) -> Self {
        let params = SynthParameters::default();
        let mut ring = RingModulator::new(config.sample_rate);
        ring.set_frequency(params.ring_mod_hz);

        Self {
            pool: VoicePool::new(config.noise_seed, config.sample_rate, table.response_len()),
            rx,
            status_tx,
            last_status: VoiceStatus::default(),
            table,
            params,
            sample_rate: config.sample_rate,
            total_gain: db_to_gain(params.total_gain_db),
            ring,
            scratch: VoiceScratch::new(),
            mix_left: vec![0.0; MAX_BLOCK_SIZE],
            mix_right: vec![0.0; MAX_BLOCK_SIZE],
        }
    }

    /// Render one device buffer and add it into `output` (interleaved,
    /// `channels` per frame). Mono receives (L + R) / 2; with two or more
    /// channels L and R go to channels 0 and 1 and the rest are untouched.
    pub fn render(&mut self, output: &mut [f32], channels: usize, sample_rate: f32) {
        if channels == 0 {
            return;
        }
        if sample_rate.is_finite() && sample_rate > 0.0 && sample_rate != self.sample_rate {
            self.set_sample_rate(sample_rate);
        }

        if let Some(command) = self.rx.try_dequeue() {
            self.apply(command);
        }

        for chunk in output.chunks_mut(MAX_BLOCK_SIZE * channels) {
            let frames = chunk.len() / channels;
            self.render_block(frames);

            let (left, right) = (&self.mix_left[..frames], &self.mix_right[..frames]);
            if channels == 1 {
                for ((out, l), r) in chunk.iter_mut().zip(left).zip(right) {
                    *out += 0.5 * (l + r);
                }
            } else {
                for ((frame, l), r) in chunk.chunks_exact_mut(channels).zip(left).zip(right) {
                    frame[0] += l;
                    frame[1] += r;
                }
            }
        }

        self.pool.retire_finished();
        self.publish_status();
    }

    fn render_block(&mut self, frames: usize) {
        let left = &mut self.mix_left[..frames];
        let right = &mut self.mix_right[..frames];
        left.fill(0.0);
        right.fill(0.0);

        for voice in self.pool.active_mut() {
            voice.render(left, right, &mut self.scratch);
        }

        self.ring.process(left, right);

        let gain = self.total_gain;
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l *= gain;
            *r *= gain;
        }
    }

    fn apply(&mut self, command: Command) {
        match command {
            Command::AddVoice { key, frequency } => {
                self.pool.add_voice(key, frequency, &self.params, &self.table);
            }
            Command::RemoveVoice => {
                self.pool.remove_voice();
            }
            Command::ReleaseVoice { key } => {
                self.pool.release_key(key);
            }
            Command::ReplaceParameters { snapshot } => {
                self.params = snapshot.sanitized();
                self.pool.apply_parameters(&self.params, &self.table);
                self.ring.set_frequency(self.params.ring_mod_hz);
                self.total_gain = db_to_gain(self.params.total_gain_db);
            }
        }
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.pool.set_sample_rate(sample_rate);
        self.ring.set_sample_rate(sample_rate);
    }

    /// Lossy: a full status ring drops the update.
    fn publish_status(&mut self) {
        let status = self.pool.status();
        if status != self.last_status && self.status_tx.push(status).is_ok() {
            self.last_status = status;
        }
    }

    /// The snapshot currently in effect.
    pub fn parameters(&self) -> &SynthParameters {
        &self.params
    }

    pub fn active_voices(&self) -> usize {
        self.pool.count()
    }

    pub fn voice_keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.pool.keys()
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }
}
