use crate::io::converter::midi_note_to_freq;

/*
Three piano octaves on an ASCII keyboard. Lower case keys are the first six
semitones of an octave, upper case the last six:

    q w e r t y Q W E R T Y   →  C3 .. B3
    a s d f g h A S D F G H   →  C4 .. B4
    z x c v b n Z X C V B N   →  C5 .. B5

Every other byte is unmapped.
*/

const LOWEST_NOTE: u8 = 48; // C3
const UNMAPPED: i8 = -1;

const LAYOUT: [&[u8; 12]; 3] = [b"qwertyQWERTY", b"asdfghASDFGH", b"zxcvbnZXCVBN"];

const fn build_table() -> [i8; 128] {
    let mut table = [UNMAPPED; 128];
    let mut octave = 0;
    while octave < LAYOUT.len() {
        let mut semitone = 0;
        while semitone < 12 {
            table[LAYOUT[octave][semitone] as usize] = (octave * 12 + semitone) as i8;
            semitone += 1;
        }
        octave += 1;
    }
    table
}

/// ASCII value → semitone offset from C3, or -1.
static KEY_TABLE: [i8; 128] = build_table();

pub fn is_valid_key(key: u8) -> bool {
    key_to_midi_note(key).is_some()
}

pub fn key_to_midi_note(key: u8) -> Option<u8> {
    let offset = *KEY_TABLE.get(key as usize)?;
    (offset != UNMAPPED).then(|| LOWEST_NOTE + offset as u8)
}

pub fn key_to_frequency(key: u8) -> Option<f32> {
    key_to_midi_note(key).map(midi_note_to_freq)
}
