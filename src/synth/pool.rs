use rustfft::FftPlanner;

use crate::{
    spatial::ImpulseResponseTable,
    synth::{
        message::VoiceStatus,
        params::SynthParameters,
        voice::{Voice, VoiceState},
    },
};

/// Maximum number of simultaneously sounding keys.
pub const KEYS_VOICED: usize = 4;

/*
Fixed pool of voices kept in age order: slots 0..count are live, slot 0 is
the oldest. Removing a voice rotates the tail of the array down one slot, so
order survives and the freed Voice value ends up just past the live range,
ready for reuse. Nothing is allocated after construction.

    add, pool full:     [A B C D] → rotate → [B C D A] → restart slot 3 → [B C D E]
    remove oldest:      [A B C _] → rotate → [B C A _] → count 2, slot 2 freed
*/
pub struct VoicePool {
    voices: [Voice; KEYS_VOICED],
    count: usize,
}

impl VoicePool {
    pub fn new(seed: u64, sample_rate: f32, response_len: usize) -> Self {
        let mut planner = FftPlanner::new();
        Self {
            voices: std::array::from_fn(|slot| {
                Voice::new(slot, seed, sample_rate, response_len, &mut planner)
            }),
            count: 0,
        }
    }

    /// Start a voice in the first free slot, evicting the oldest one when
    /// full. Returns the evicted key.
    pub fn add_voice(
        &mut self,
        key: u8,
        frequency: f32,
        params: &SynthParameters,
        table: &ImpulseResponseTable,
    ) -> Option<u8> {
        let evicted = if self.count == KEYS_VOICED {
            let oldest = self.voices[0].key();
            self.voices.rotate_left(1);
            self.count -= 1;
            Some(oldest)
        } else {
            None
        };

        self.voices[self.count].start(key, frequency, params, table);
        self.count += 1;
        evicted
    }

    /// Drop the oldest voice without a fade. No-op on an empty pool.
    pub fn remove_voice(&mut self) -> Option<u8> {
        if self.count == 0 {
            return None;
        }
        let key = self.voices[0].key();
        self.remove_at(0);
        Some(key)
    }

    fn remove_at(&mut self, index: usize) {
        self.voices[index..self.count].rotate_left(1);
        self.count -= 1;
        self.voices[self.count].free();
    }

    /// Release the oldest held voice playing `key`. Returns false if none was held.
    pub fn release_key(&mut self, key: u8) -> bool {
        match self
            .active_mut()
            .iter_mut()
            .find(|v| v.key() == key && v.state() == VoiceState::Active)
        {
            Some(voice) => {
                voice.release();
                true
            }
            None => false,
        }
    }

    /// Compact out voices whose envelope ended, keeping age order.
    pub fn retire_finished(&mut self) -> usize {
        let mut retired = 0;
        let mut index = 0;
        while index < self.count {
            if self.voices[index].is_finished() {
                self.remove_at(index);
                retired += 1;
            } else {
                index += 1;
            }
        }
        retired
    }

    /// Push a new snapshot into every live voice, cross-fading direction changes.
    pub fn apply_parameters(&mut self, params: &SynthParameters, table: &ImpulseResponseTable) {
        for voice in self.active_mut() {
            voice.apply_parameters(params, table, true);
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        for voice in &mut self.voices {
            voice.set_sample_rate(sample_rate);
        }
    }

    pub fn active(&self) -> &[Voice] {
        &self.voices[..self.count]
    }

    pub fn active_mut(&mut self) -> &mut [Voice] {
        &mut self.voices[..self.count]
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Keys of live voices, oldest first.
    pub fn keys(&self) -> impl Iterator<Item = u8> + '_ {
        self.active().iter().map(Voice::key)
    }

    pub fn status(&self) -> VoiceStatus {
        VoiceStatus::from_voices(
            self.active()
                .iter()
                .map(|v| (v.key(), v.state() == VoiceState::Active)),
        )
    }
}
