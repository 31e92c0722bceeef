use crate::synth::{params::SynthParameters, pool::KEYS_VOICED};

/// A control intent, consumed exactly once by the render context.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Command {
    /// Start a voice, evicting the oldest one if the pool is full.
    AddVoice { key: u8, frequency: f32 },
    /// Drop the oldest voice immediately.
    RemoveVoice,
    /// Release the oldest held voice playing `key`.
    ReleaseVoice { key: u8 },
    /// Swap in a new parameter snapshot.
    ReplaceParameters { snapshot: SynthParameters },
}

/// Snapshot of the live voices, published by the renderer after each change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct VoiceStatus {
    count: u8,
    keys: [u8; KEYS_VOICED],
    held: [bool; KEYS_VOICED],
}

impl VoiceStatus {
    /// Build from `(key, held)` pairs, oldest first. Extra entries are ignored.
    pub fn from_voices(voices: impl IntoIterator<Item = (u8, bool)>) -> Self {
        let mut status = Self::default();
        for (slot, (key, held)) in voices.into_iter().take(KEYS_VOICED).enumerate() {
            status.keys[slot] = key;
            status.held[slot] = held;
            status.count += 1;
        }
        status
    }

    pub fn count(&self) -> usize {
        self.count as usize
    }

    /// Keys of the live voices, oldest first.
    pub fn keys(&self) -> &[u8] {
        &self.keys[..self.count as usize]
    }

    /// Oldest voice whose key is still held (not releasing).
    pub fn oldest_held(&self) -> Option<u8> {
        self.keys()
            .iter()
            .zip(&self.held)
            .find(|(_, held)| **held)
            .map(|(&key, _)| key)
    }
}
