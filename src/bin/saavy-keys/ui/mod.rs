//! TUI for saavy-keys
//!
//! Mouse events are hit-tested against the drawn keyboard, turned into
//! per-key pointer events by the hover tracker, and fed one at a time to the
//! input state machine.

mod keyboard;
mod scope;
mod spectrum;
mod status;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;

use saavy_keys::{
    Buttons, HoverTracker, InputStateMachine, KeyId, PointerEvent, RingOutput, Session, Transition,
};

use keyboard::Keyboard;
use scope::render_scope;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use status::{render_status, AudioStats};

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

const GAIN_STEP: f32 = 0.05;

pub struct KeysApp {
    session: Session<RingOutput>,
    input: InputStateMachine,
    hover: HoverTracker,
    keyboard: Keyboard,
    /// Ring buffer receiver for rendered samples
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    sample_rate: f32,
    /// Last rejected press, shown until the next successful one
    notice: Option<String>,
    should_quit: bool,
}

impl KeysApp {
    pub fn new(session: Session<RingOutput>, audio_rx: Consumer<f32>, sample_rate: f32) -> Self {
        let keyboard = Keyboard::new(session.pitch());
        Self {
            session,
            input: InputStateMachine::new(),
            hover: HoverTracker::new(),
            keyboard,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            sample_rate,
            notice: None,
            should_quit: false,
        }
    }

    /// Run the UI event loop until quit. Every key is released on the way out.
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.session.output_mut().flush_parked();
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // Drain everything pending so a fast drag is not replayed late
            if event::poll(Duration::from_millis(16))? {
                loop {
                    self.handle_event(event::read()?);
                    if self.should_quit || !event::poll(Duration::ZERO)? {
                        break;
                    }
                }
            }
        }

        let released = self.input.release_all(&mut self.session);
        tracing::info!(released, "keyboard closed");
        Ok(())
    }

    /// Keep the last VIS_BUFFER_SIZE samples from the audio thread
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }
        self.audio_buffer.reserve(available);
        while let Ok(sample) = self.audio_rx.pop() {
            self.audio_buffer.push(sample);
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key.code),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // A button released outside the terminal never reports Up
            Event::FocusLost => {
                self.hover.update(None, Buttons::NONE);
                self.input.release_all(&mut self.session);
            }
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let over = self.keyboard.key_at(mouse.column, mouse.row);
        let events = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.hover.down(over),
            MouseEventKind::Up(MouseButton::Left) => self.hover.up(over),
            MouseEventKind::Drag(MouseButton::Left) => self.hover.update(over, Buttons::PRIMARY),
            MouseEventKind::Down(button) | MouseEventKind::Drag(button) => {
                self.hover.update(over, other_button(button))
            }
            MouseEventKind::Moved => self.hover.update(over, Buttons::NONE),
            _ => return,
        };
        self.dispatch(events);
    }

    fn dispatch(&mut self, events: Vec<(KeyId, PointerEvent)>) {
        for (key, event) in events {
            match self.input.handle(key, event, &mut self.session) {
                Transition::Pressed(_) => self.notice = None,
                Transition::Rejected(err) => self.notice = Some(format!("{}: {}", key, err)),
                Transition::Released | Transition::Ignored => {}
            }
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char('w') | KeyCode::Char('W') => {
                let next = self.session.tone().kind().next();
                self.session.select_waveform(next);
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.nudge_gain(GAIN_STEP),
            KeyCode::Char('-') | KeyCode::Down => self.nudge_gain(-GAIN_STEP),
            // Panic button
            KeyCode::Char(' ') => {
                self.input.release_all(&mut self.session);
            }
            _ => {}
        }
    }

    fn nudge_gain(&mut self, step: f32) {
        let gain = self.session.tone().current_gain() + step;
        if let Err(err) = self.session.set_gain(gain) {
            tracing::warn!(%err, "gain change refused");
        }
    }

    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),  // Status bar
                Constraint::Min(6),     // Keyboard
                Constraint::Length(10), // Scope + spectrum
                Constraint::Length(1),  // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_status(
            frame,
            chunks[0],
            &self.session,
            self.sample_rate,
            &stats,
            self.notice.as_deref(),
        );

        self.keyboard.render(frame, chunks[1], &self.input);

        let panels = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(chunks[2]);
        render_scope(frame, panels[0], &self.audio_buffer);

        let pressed_hz: Vec<f64> = self
            .input
            .pressed_keys()
            .into_iter()
            .filter_map(|key| self.session.pitch().frequency(key).ok())
            .collect();
        render_spectrum(frame, panels[1], &self.spectrum, &pressed_hz);

        let help = Paragraph::new(
            " [Mouse] Play/drag  [W] Waveform  [+/-] Gain  [Space] Release all  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}

fn other_button(button: MouseButton) -> Buttons {
    match button {
        MouseButton::Left => Buttons::PRIMARY,
        MouseButton::Right => Buttons::SECONDARY,
        MouseButton::Middle => Buttons::MIDDLE,
    }
}
