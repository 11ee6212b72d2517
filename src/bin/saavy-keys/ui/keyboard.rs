//! Keyboard widget - one box per octave, one column per natural key
//!
//! The layout is recomputed on every draw and kept for mouse hit-testing, so
//! the keys a click lands on are always the keys that were last drawn.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use saavy_keys::{pitch::OctaveSlot, InputStateMachine, KeyId, NoteName, PitchTable};

pub struct Keyboard {
    octaves: Vec<OctaveSlot>,
    /// Screen rectangle of each key from the last layout
    hits: Vec<(Rect, KeyId)>,
}

impl Keyboard {
    pub fn new(table: &PitchTable) -> Self {
        let octaves = table
            .octaves()
            .into_iter()
            .filter(|slot| !slot.keys.is_empty())
            .collect();
        Self {
            octaves,
            hits: Vec::new(),
        }
    }

    /// Split `area` into octave boxes and key columns.
    pub fn layout(&mut self, area: Rect) -> Vec<(Rect, u8)> {
        self.hits.clear();
        if self.octaves.is_empty() {
            return Vec::new();
        }

        let n = self.octaves.len() as u32;
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints((0..n).map(|_| Constraint::Ratio(1, n)))
            .split(area);

        let mut boxes = Vec::with_capacity(self.octaves.len());
        for (slot, &octave_area) in self.octaves.iter().zip(columns.iter()) {
            boxes.push((octave_area, slot.octave));
            let inner = Block::default().borders(Borders::ALL).inner(octave_area);
            let k = slot.keys.len() as u32;
            let keys = Layout::default()
                .direction(Direction::Horizontal)
                .constraints((0..k).map(|_| Constraint::Ratio(1, k)))
                .split(inner);
            for (&key, &rect) in slot.keys.iter().zip(keys.iter()) {
                self.hits.push((rect, key));
            }
        }
        boxes
    }

    /// The key drawn at a terminal cell, if any.
    pub fn key_at(&self, column: u16, row: u16) -> Option<KeyId> {
        let pos = Position::new(column, row);
        self.hits
            .iter()
            .find(|(rect, _)| rect.contains(pos))
            .map(|&(_, key)| key)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, input: &InputStateMachine) {
        for (octave_area, octave) in self.layout(area) {
            let block = Block::default()
                .title(format!(" Octave {} ", octave))
                .borders(Borders::ALL);
            frame.render_widget(block, octave_area);
        }

        for &(rect, key) in &self.hits {
            let style = if input.is_pressed(key) {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Black).bg(Color::White)
            };
            let label = if key.note == NoteName::C {
                key.to_string()
            } else {
                key.note.to_string()
            };
            // Label sits at the bottom of the key, like printed keycaps
            let mut text = vec![String::new(); rect.height.saturating_sub(1) as usize];
            text.push(label);
            let separator = Block::default()
                .borders(Borders::RIGHT)
                .border_style(Style::default().fg(Color::DarkGray));
            let key_widget = Paragraph::new(text.join("\n"))
                .alignment(Alignment::Center)
                .style(style)
                .block(separator);
            frame.render_widget(key_widget, rect);
        }
    }
}
