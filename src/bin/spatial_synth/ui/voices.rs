//! Voice and parameter panel

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use spatial_synth::{
    io::{key_to_midi_note, note_name},
    synth::{EnvelopeMode, SynthParameters, VoiceStatus, KEYS_VOICED},
};

pub fn render_voices(
    frame: &mut Frame,
    area: Rect,
    status: &VoiceStatus,
    params: &SynthParameters,
    sample_rate: f32,
) {
    let block = Block::default().title(" spatial-synth ").borders(Borders::ALL);

    let mut voices = vec![Span::styled(
        format!(" Voices {}/{}  ", status.count(), KEYS_VOICED),
        Style::default().fg(Color::Cyan),
    )];
    for &key in status.keys() {
        let label = match key_to_midi_note(key) {
            Some(note) => {
                let (name, octave) = note_name(note);
                format!("[{} {}{}] ", key as char, name, octave)
            }
            None => format!("[{}] ", key as char),
        };
        voices.push(Span::styled(
            label,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ));
    }

    let mode = match params.envelope_mode {
        EnvelopeMode::Adsr => "ADSR".to_string(),
        EnvelopeMode::Percussive { decay, .. } => format!("percussive τ={decay:.2}s"),
    };
    let ring = if params.ring_mod_hz > 0.0 {
        format!("{:.0} Hz", params.ring_mod_hz)
    } else {
        "off".to_string()
    };

    let lines = vec![
        Line::from(voices),
        Line::from(format!(
            " Osc 1: {:?}  azimuth {:>3}°  distance {:.2}",
            params.oscillators[0].waveform,
            params.oscillators[0].azimuth,
            params.oscillators[0].distance
        )),
        Line::from(format!(
            " Gain {:+.1} dB   Envelope {mode}   Ring mod {ring}",
            params.total_gain_db
        )),
        Line::from(Span::styled(
            format!(" {:.1} kHz", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
