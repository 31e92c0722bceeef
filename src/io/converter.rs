const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Equal-tempered frequency of a MIDI note, A4 (69) = 440 Hz.
pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Scientific pitch name, e.g. 60 → ("C", 4).
pub fn note_name(note: u8) -> (&'static str, i8) {
    let octave = (note / 12) as i8 - 1;
    (NOTE_NAMES[(note % 12) as usize], octave)
}
