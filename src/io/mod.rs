// Purpose - external interfaces, format conversions

pub mod converter;
pub mod keymap;

pub use converter::{midi_note_to_freq, note_name};
pub use keymap::{is_valid_key, key_to_frequency, key_to_midi_note};
