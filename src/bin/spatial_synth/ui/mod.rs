//! Keyboard TUI: plays notes, steers oscillator 1, shows the voices and output.

mod scope;
mod voices;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use tracing::warn;

use spatial_synth::{
    dsp::SILENCE_DB,
    synth::{params::MAX_GAIN_DB, VoiceStatus},
    ControlError, SynthHandle,
};

use scope::render_scope;
use voices::render_voices;

/// Frames shown in the oscilloscope
const VIS_BUFFER_SIZE: usize = 1024;
const AZIMUTH_STEP: u16 = 15;
const GAIN_STEP_DB: f32 = 1.0;
const HELP: &str = " [qwerty/asdfgh/zxcvbn ±Shift] Play  [,] Release  [.] Cut  \
                    [←/→] Azimuth  [↑/↓] Gain  [Space/Esc] Quit";

pub struct KeyboardApp {
    handle: SynthHandle,
    scope_rx: Consumer<(f32, f32)>,
    scope: Vec<(f32, f32)>,
    status: VoiceStatus,
    sample_rate: f32,
    last_error: Option<ControlError>,
    should_quit: bool,
}

impl KeyboardApp {
    pub fn new(handle: SynthHandle, scope_rx: Consumer<(f32, f32)>, sample_rate: f32) -> Self {
        Self {
            handle,
            scope_rx,
            scope: vec![(0.0, 0.0); VIS_BUFFER_SIZE],
            status: VoiceStatus::default(),
            sample_rate,
            last_error: None,
            should_quit: false,
        }
    }

    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_scope();
            self.status = self.handle.status();

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn poll_scope(&mut self) {
        let mut received = false;
        while let Ok(frame) = self.scope_rx.pop() {
            self.scope.push(frame);
            received = true;
        }
        if received && self.scope.len() > VIS_BUFFER_SIZE {
            let excess = self.scope.len() - VIS_BUFFER_SIZE;
            self.scope.drain(0..excess);
        }
    }

    fn handle_key(&mut self, code: KeyCode) {
        let result = match code {
            KeyCode::Char(' ') | KeyCode::Esc => {
                self.should_quit = true;
                Ok(())
            }
            KeyCode::Char('.') => self.handle.remove_oldest(),
            KeyCode::Char(',') => match self.status.oldest_held() {
                Some(key) => self.handle.note_off(key),
                None => Ok(()),
            },
            KeyCode::Left => self.rotate(-(AZIMUTH_STEP as i32)),
            KeyCode::Right => self.rotate(AZIMUTH_STEP as i32),
            KeyCode::Up => self.adjust_gain(GAIN_STEP_DB),
            KeyCode::Down => self.adjust_gain(-GAIN_STEP_DB),
            KeyCode::Char(c) if c.is_ascii() => self.handle.press_key(c as u8),
            _ => Ok(()),
        };

        self.last_error = result.err();
        if let Some(err) = self.last_error {
            warn!(%err, "key not applied");
        }
    }

    fn rotate(&mut self, step: i32) -> Result<(), ControlError> {
        let mut params = *self.handle.parameters();
        let azimuth = params.oscillators[0].azimuth as i32;
        params.oscillators[0].azimuth = (azimuth + step).rem_euclid(360) as u16;
        self.handle.update_parameters(params)
    }

    fn adjust_gain(&mut self, step: f32) -> Result<(), ControlError> {
        let mut params = *self.handle.parameters();
        params.total_gain_db = (params.total_gain_db + step).clamp(SILENCE_DB, MAX_GAIN_DB);
        self.handle.update_parameters(params)
    }

    fn render(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(7), // Voices and parameters
                Constraint::Min(8),    // Oscilloscope
                Constraint::Length(1), // Error line
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        render_voices(
            frame,
            chunks[0],
            &self.status,
            self.handle.parameters(),
            self.sample_rate,
        );
        render_scope(frame, chunks[1], &self.scope);

        if let Some(err) = self.last_error {
            let line = Paragraph::new(format!(" {err}")).style(Style::default().fg(Color::Red));
            frame.render_widget(line, chunks[2]);
        }

        let help = Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
