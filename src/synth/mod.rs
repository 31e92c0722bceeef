// Purpose: voice management, polyphony and the control/render boundary.
// The control side talks to the renderer only through the command channel.

pub mod channel;
pub mod handle;
pub mod message;
pub mod params;
pub mod poly;
pub mod pool;
pub mod voice;

use std::sync::Arc;

use rtrb::RingBuffer;

pub use channel::{command_channel, CommandReceiver, CommandSender};
pub use handle::SynthHandle;
pub use message::{Command, VoiceStatus};
pub use params::{AdsrParams, EnvelopeMode, FilterParams, OscillatorParams, SynthParameters};
pub use poly::PolySynth;
pub use pool::KEYS_VOICED;

use crate::{config::SynthConfig, spatial::ImpulseResponseTable};

/// Build a connected control handle and renderer pair.
pub fn build(config: &SynthConfig, table: Arc<ImpulseResponseTable>) -> (SynthHandle, PolySynth) {
    let (tx, rx) = command_channel();
    let (status_tx, status_rx) = RingBuffer::new(config.status_capacity.max(1));

    let handle = SynthHandle::new(tx, status_rx, config.ack_timeout());
    let synth = PolySynth::new(config, table, rx, status_tx);
    (handle, synth)
}
