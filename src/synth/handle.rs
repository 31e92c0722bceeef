use std::time::Duration;

use rtrb::Consumer;
use tracing::{debug, warn};

use crate::{
    error::ControlError,
    io::keymap,
    synth::{
        channel::CommandSender,
        message::{Command, VoiceStatus},
        params::SynthParameters,
    },
};

/// Control-side API. Lives on the UI / main thread, never in the audio callback.
///
/// Every send first waits (bounded by the configured timeout) for the
/// renderer to take the previous command, so callers see
/// [`ControlError::AckTimeout`] rather than [`ControlError::ChannelBusy`].
/// Use [`SynthHandle::try_send`] for a non-waiting send.
pub struct SynthHandle {
    tx: CommandSender,
    status_rx: Consumer<VoiceStatus>,
    status: VoiceStatus,
    params: SynthParameters,
    ack_timeout: Duration,
}

impl SynthHandle {
    pub fn new(tx: CommandSender, status_rx: Consumer<VoiceStatus>, ack_timeout: Duration) -> Self {
        Self {
            tx,
            status_rx,
            status: VoiceStatus::default(),
            params: SynthParameters::default(),
            ack_timeout,
        }
    }

    pub fn note_on(&mut self, key: u8, frequency: f32) -> Result<(), ControlError> {
        debug!(key, frequency, "note on");
        self.send(Command::AddVoice { key, frequency })
    }

    /// Look `key` up in the keyboard map and start a note for it.
    pub fn press_key(&mut self, key: u8) -> Result<(), ControlError> {
        let Some(frequency) = keymap::key_to_frequency(key) else {
            warn!(key, "rejected unmapped key");
            return Err(ControlError::InvalidKey(key));
        };
        self.note_on(key, frequency)
    }

    pub fn note_off(&mut self, key: u8) -> Result<(), ControlError> {
        debug!(key, "note off");
        self.send(Command::ReleaseVoice { key })
    }

    /// Cut the oldest voice without a release.
    pub fn remove_oldest(&mut self) -> Result<(), ControlError> {
        debug!("remove oldest voice");
        self.send(Command::RemoveVoice)
    }

    /// Sanitize and send a snapshot. On success it becomes [`SynthHandle::parameters`].
    pub fn update_parameters(&mut self, snapshot: SynthParameters) -> Result<(), ControlError> {
        let snapshot = snapshot.sanitized();
        self.send(Command::ReplaceParameters { snapshot })?;
        self.params = snapshot;
        Ok(())
    }

    /// The last snapshot successfully sent.
    pub fn parameters(&self) -> &SynthParameters {
        &self.params
    }

    /// Latest voice status published by the renderer.
    pub fn status(&mut self) -> VoiceStatus {
        while let Ok(status) = self.status_rx.pop() {
            self.status = status;
        }
        self.status
    }

    /// Enqueue without waiting; fails with `ChannelBusy` if the slot is taken.
    pub fn try_send(&mut self, command: Command) -> Result<(), ControlError> {
        self.tx.enqueue(command).inspect_err(|err| warn!(%err, "command rejected"))
    }

    /// Block (bounded) until the renderer has taken the last command.
    pub fn wait_acknowledged(&self) -> Result<(), ControlError> {
        self.tx.wait_acknowledged(self.ack_timeout)
    }

    fn send(&mut self, command: Command) -> Result<(), ControlError> {
        self.tx
            .send(command, self.ack_timeout)
            .inspect_err(|err| warn!(%err, "command not delivered"))
    }
}
