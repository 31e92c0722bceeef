use std::{
    thread,
    time::{Duration, Instant},
};

use rtrb::{Consumer, Producer, RingBuffer};

use crate::{error::ControlError, synth::message::Command};

/// Commands in flight at once.
const CAPACITY: usize = 1;
/// Sleep between acknowledgement polls on the control side.
pub const ACK_POLL_INTERVAL: Duration = Duration::from_micros(20);

/// Single-slot SPSC mailbox from the control context to the renderer.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    let (producer, consumer) = RingBuffer::new(CAPACITY);
    (CommandSender { producer }, CommandReceiver { consumer })
}

/// Control-side end. Never used from the render context.
pub struct CommandSender {
    producer: Producer<Command>,
}

impl CommandSender {
    /// Place `command` in the slot, or fail with [`ControlError::ChannelBusy`]
    /// if the previous one has not been taken yet.
    pub fn enqueue(&mut self, command: Command) -> Result<(), ControlError> {
        self.producer
            .push(command)
            .map_err(|_| ControlError::ChannelBusy)
    }

    /// True once the renderer has taken the last command.
    pub fn is_acknowledged(&self) -> bool {
        self.producer.slots() == CAPACITY
    }

    /// Poll until acknowledged, sleeping [`ACK_POLL_INTERVAL`] between checks.
    pub fn wait_acknowledged(&self, timeout: Duration) -> Result<(), ControlError> {
        let start = Instant::now();
        while !self.is_acknowledged() {
            if start.elapsed() >= timeout {
                return Err(ControlError::AckTimeout(timeout.as_millis() as u64));
            }
            thread::sleep(ACK_POLL_INTERVAL);
        }
        Ok(())
    }

    /// Wait for the slot to free up, then enqueue.
    pub fn send(&mut self, command: Command, timeout: Duration) -> Result<(), ControlError> {
        self.wait_acknowledged(timeout)?;
        self.enqueue(command)
    }
}

/// Render-side end.
pub struct CommandReceiver {
    consumer: Consumer<Command>,
}

impl CommandReceiver {
    /// Take the pending command, if any. Never blocks.
    #[inline]
    pub fn try_dequeue(&mut self) -> Option<Command> {
        self.consumer.pop().ok()
    }
}
